use std::{
  collections::{BTreeSet, HashSet},
  sync::LazyLock,
};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

static PYTHON_KEYWORDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
    "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
  ]
  .into_iter()
  .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Transliterates to ASCII, turns every run of non-identifier characters into a single underscore
/// and trims underscores from both ends.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Converts a document name into a Python attribute or function name (`snake_case`).
///
/// # Rules:
/// 1. Sanitizes the name and converts it to `snake_case`.
/// 2. An empty result becomes `field`.
/// 3. A result starting with a digit is prefixed with `field_` (a leading underscore would make it
///    private to pydantic).
/// 4. A keyword gets a trailing underscore.
pub(crate) fn to_python_field_name(name: &str) -> String {
  let mut ident = sanitize(name).to_snake_case();

  if ident.is_empty() {
    return "field".to_string();
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert_str(0, "field_");
  }
  if PYTHON_KEYWORDS.contains(ident.as_str()) {
    ident.push('_');
  }
  ident
}

/// Converts a document name into a Python class name (`PascalCase`).
///
/// Names that are already mixed case without separators keep their capitalisation, so `ApiResponse`
/// stays `ApiResponse` instead of becoming `Apiresponse`.
pub(crate) fn to_python_class_name(name: &str) -> String {
  let sanitized = sanitize(name);
  let has_upper = sanitized.chars().any(|c| c.is_ascii_uppercase());
  let has_lower = sanitized.chars().any(|c| c.is_ascii_lowercase());

  let mut ident = if has_upper && has_lower && !sanitized.contains('_') {
    let mut chars = sanitized.chars();
    chars
      .next()
      .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
      .unwrap_or_default()
  } else {
    sanitized.to_pascal_case()
  };

  if ident.is_empty() {
    return "Model".to_string();
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert_str(0, "Model");
  }
  if PYTHON_KEYWORDS.contains(ident.as_str()) {
    ident.push('_');
  }
  ident
}

/// Converts an enum label into an enum member name (`CONSTANT_CASE`).
pub(crate) fn to_python_constant_name(label: &str) -> String {
  let mut ident = sanitize(label).to_constant_case();

  if ident.is_empty() {
    return "EMPTY".to_string();
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert_str(0, "VALUE_");
  }
  ident
}

/// The class name for the enum behind `property` on `owner`.
///
/// Array properties name their item type, so `Pet.tags` holding enum labels becomes `PetTag`.
pub(crate) fn enum_class_name(owner: &str, property: &str, is_array: bool) -> String {
  let property = if is_array {
    cruet::to_singular(property)
  } else {
    property.to_string()
  };
  format!("{}{}", to_python_class_name(owner), to_python_class_name(&property))
}

/// Appends the smallest numeric suffix (starting at 2) that makes `base_name` unused.
pub(crate) fn ensure_unique(base_name: &str, used_names: &BTreeSet<String>) -> String {
  if !used_names.contains(base_name) {
    return base_name.to_string();
  }
  (2..)
    .map(|i| format!("{base_name}{i}"))
    .find(|candidate| !used_names.contains(candidate))
    .unwrap_or_else(|| base_name.to_string())
}

/// A double-quoted Python string literal.
pub(crate) fn python_string(text: &str) -> String {
  let mut literal = String::with_capacity(text.len() + 2);
  literal.push('"');
  for ch in text.chars() {
    match ch {
      '"' => literal.push_str("\\\""),
      '\\' => literal.push_str("\\\\"),
      '\n' => literal.push_str("\\n"),
      '\r' => literal.push_str("\\r"),
      '\t' => literal.push_str("\\t"),
      other => literal.push(other),
    }
  }
  literal.push('"');
  literal
}
