use std::sync::Arc;

use serde_json::{Value, json};

use crate::{
  OpenApiDefinition,
  config::ExtractionConfig,
  document::{self, DocumentFormat},
  model::Schema,
};

pub(super) const PETSTORE: &str = include_str!("../../fixtures/petstore.yaml");

pub(super) fn petstore() -> Value {
  document::parse_str(PETSTORE, DocumentFormat::Yaml).expect("petstore fixture should parse")
}

pub(super) fn petstore_definition() -> OpenApiDefinition {
  OpenApiDefinition::from_document(petstore(), ExtractionConfig::default()).expect("petstore should extract")
}

/// A minimal document with the given `components.schemas` and `paths` sections.
pub(super) fn document_with(schemas: Value, paths: Value) -> Value {
  json!({
    "openapi": "3.0.3",
    "info": { "title": "Test", "version": "1.0.0" },
    "paths": paths,
    "components": { "schemas": schemas }
  })
}

pub(super) fn extract(document: Value) -> OpenApiDefinition {
  OpenApiDefinition::from_document(document, ExtractionConfig::default()).expect("extraction should succeed")
}

pub(super) fn extract_lenient(document: Value) -> OpenApiDefinition {
  OpenApiDefinition::from_document(document, ExtractionConfig::lenient()).expect("extraction should succeed")
}

pub(super) fn ordered_names<'a>(order: &[(&'a String, &Arc<Schema>)]) -> Vec<&'a str> {
  order.iter().map(|(name, _)| name.as_str()).collect()
}

pub(super) fn pet_schema() -> Value {
  json!({
    "type": "object",
    "required": ["id", "name"],
    "properties": {
      "id": { "type": "integer", "format": "int64" },
      "name": { "type": "string" }
    }
  })
}
