use std::ops::RangeInclusive;

use http::StatusCode;

pub const SUCCESS_RANGE: RangeInclusive<u16> = 200..=226;
pub const FAILURE_RANGE: RangeInclusive<u16> = 400..=500;

pub const DEFAULT_KEY: &str = "default";

/// Maps a `responses` key to the status code it stands for.
///
/// `default` maps to `default_status`, range keys such as `2XX` map to the first code of the range
/// and anything that is not a valid status yields `None`.
pub fn classify(key: &str, default_status: StatusCode) -> Option<StatusCode> {
  if key.eq_ignore_ascii_case(DEFAULT_KEY) {
    return Some(default_status);
  }

  let code = match key.as_bytes() {
    [class @ b'1'..=b'5', b'X' | b'x', b'X' | b'x'] => u16::from(class - b'0') * 100,
    _ => key.parse::<u16>().ok()?,
  };
  StatusCode::from_u16(code).ok()
}

pub fn is_success(code: StatusCode) -> bool {
  SUCCESS_RANGE.contains(&code.as_u16())
}

pub fn is_failure(code: StatusCode) -> bool {
  FAILURE_RANGE.contains(&code.as_u16())
}
