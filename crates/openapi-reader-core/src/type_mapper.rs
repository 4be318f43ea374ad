use serde_json::Value;

use crate::model::SemanticType;

/// Maps an OpenAPI primitive `type` and `format` to a [`SemanticType`].
///
/// Unknown or absent types yield `None`; callers decide whether a reference stands in for them.
pub fn map_type(declared: Option<&str>, format: Option<&str>) -> Option<SemanticType> {
  match declared? {
    "string" => Some(match format {
      Some("date-time") => SemanticType::DateTime,
      Some("date") => SemanticType::Date,
      _ => SemanticType::String,
    }),
    "integer" => Some(SemanticType::Integer),
    "number" => Some(SemanticType::Float),
    "boolean" => Some(SemanticType::Boolean),
    "array" => Some(SemanticType::Array),
    _ => None,
  }
}

/// The declared `type` of a definition together with its nullability.
///
/// OpenAPI 3.1 spells nullable types as `type: [string, "null"]`; the first non-null entry wins.
pub(crate) fn declared_type(definition: &Value) -> (Option<&str>, bool) {
  let explicit_nullable = definition.get("nullable").and_then(Value::as_bool).unwrap_or(false);

  match definition.get("type") {
    Some(Value::String(name)) => (Some(name.as_str()), explicit_nullable),
    Some(Value::Array(names)) => {
      let names: Vec<&str> = names.iter().filter_map(Value::as_str).collect();
      let nullable = explicit_nullable || names.contains(&"null");
      (names.into_iter().find(|name| *name != "null"), nullable)
    }
    _ => (None, explicit_nullable),
  }
}

pub(crate) fn format_of(definition: &Value) -> Option<&str> {
  definition.get("format").and_then(Value::as_str)
}
