use oas3::spec::{Ref, RefType};
use serde_json::Value;

pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// The `components` section a local `$ref` points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "camelCase")]
pub enum ComponentKind {
  Schemas,
  Parameters,
  RequestBodies,
  Responses,
  Other,
}

impl From<RefType> for ComponentKind {
  fn from(value: RefType) -> Self {
    match value {
      RefType::Schema => Self::Schemas,
      RefType::Parameter => Self::Parameters,
      RefType::RequestBody => Self::RequestBodies,
      RefType::Response => Self::Responses,
      _ => Self::Other,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
  pub kind: ComponentKind,
  pub name: String,
}

/// Parses a local `#/components/<kind>/<name>` pointer.
///
/// Returns `None` for pointers into another document and for local pointers that do not address a
/// component.
pub fn parse_component_ref(ref_path: &str) -> Option<ComponentRef> {
  if !ref_path.starts_with("#/components") {
    return None;
  }

  match ref_path.parse::<Ref>() {
    Ok(component) => Some(ComponentRef {
      kind: component.kind.into(),
      name: component.name,
    }),
    Err(_) => None,
  }
}

/// Extracts the schema name from a `#/components/schemas/<name>` pointer.
pub fn parse_schema_ref_path(ref_path: &str) -> Option<String> {
  parse_component_ref(ref_path)
    .filter(|component| component.kind == ComponentKind::Schemas)
    .map(|component| component.name)
}

/// Whether the pointer leaves the current document (`other.yaml#/...`, `https://...`).
pub fn is_external_ref(ref_path: &str) -> bool {
  !ref_path.starts_with('#')
}

/// The `$ref` string of a JSON value, if it is a reference object.
pub fn ref_of(value: &Value) -> Option<&str> {
  value.get("$ref").and_then(Value::as_str)
}

/// Finds a `$ref` that is wrapped in a single-element `allOf`/`oneOf`/`anyOf`.
///
/// OpenAPI 3.0 documents use this shape to attach a description to a referenced schema.
pub fn single_composed_ref(value: &Value) -> Option<&str> {
  ["allOf", "oneOf", "anyOf"].iter().find_map(|key| match value.get(*key)?.as_array()?.as_slice() {
    [only] => ref_of(only),
    _ => None,
  })
}
