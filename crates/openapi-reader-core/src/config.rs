use http::StatusCode;
use strum::{Display, EnumString};

/// What to do with a `$ref` that cannot be followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ReferencePolicy {
  /// Abort the extraction pass.
  #[default]
  Strict,
  /// Drop the reference and record a [`Diagnostic::UnresolvedReference`](crate::Diagnostic).
  Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, bon::Builder)]
pub struct ExtractionConfig {
  #[builder(default)]
  pub reference_policy: ReferencePolicy,
  /// Status the literal `default` response key is classified as.
  #[builder(default = StatusCode::OK)]
  pub default_status: StatusCode,
}

impl Default for ExtractionConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl ExtractionConfig {
  pub fn lenient() -> Self {
    Self::builder().reference_policy(ReferencePolicy::Lenient).build()
  }

  pub fn is_strict(&self) -> bool {
    self.reference_policy == ReferencePolicy::Strict
  }
}
