//! Turns raw YAML or JSON bytes into the order-preserving value tree the extraction passes read.

use std::{ffi::OsStr, path::Path};

use serde_json::{Map, Value};

use crate::error::{ExtractionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
  #[default]
  Json,
  Yaml,
}

impl DocumentFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext.to_ascii_lowercase().as_str() {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }

  #[must_use]
  pub fn from_path(path: &Path) -> Self {
    path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(Self::default(), Self::from_extension)
  }
}

pub fn parse(bytes: &[u8], format: DocumentFormat) -> Result<Value> {
  let value = match format {
    DocumentFormat::Json => serde_json::from_slice::<Value>(bytes)?,
    DocumentFormat::Yaml => serde_yaml::from_slice::<Value>(bytes)?,
  };
  Ok(value)
}

pub fn parse_str(content: &str, format: DocumentFormat) -> Result<Value> {
  parse(content.as_bytes(), format)
}

/// Looks up `components.schemas`, failing if the section is absent or not a mapping.
pub(crate) fn component_schemas(document: &Value) -> Result<&Map<String, Value>> {
  let components = document
    .get("components")
    .ok_or_else(|| ExtractionError::missing("components"))?;
  components
    .get("schemas")
    .ok_or_else(|| ExtractionError::missing("components.schemas"))?
    .as_object()
    .ok_or_else(|| ExtractionError::not_a_mapping("components.schemas"))
}

pub(crate) fn components(document: &Value) -> Option<&Map<String, Value>> {
  document.get("components").and_then(Value::as_object)
}

pub(crate) fn paths(document: &Value) -> Result<&Map<String, Value>> {
  document
    .get("paths")
    .ok_or_else(|| ExtractionError::missing("paths"))?
    .as_object()
    .ok_or_else(|| ExtractionError::not_a_mapping("paths"))
}

/// Checks the keys both passes depend on before either of them runs.
pub(crate) fn validate(document: &Value) -> Result<()> {
  if !document.is_object() {
    return Err(ExtractionError::not_a_mapping("<root>"));
  }
  component_schemas(document)?;
  paths(document)?;
  Ok(())
}
