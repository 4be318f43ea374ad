use std::collections::HashMap;

use openapi_reader_core::{
  OpenApiDefinition,
  config::ExtractionConfig,
  document::{self, DocumentFormat},
};

use crate::codegen::{Concurrency, EmitOptions, Emitter};

pub(super) const PETSTORE: &str = include_str!("../../../../openapi-reader-core/fixtures/petstore.yaml");

/// Standalone component schemas exercising wrappers, constraints and enum naming.
pub(super) const WIDGETS: &str = r"
openapi: 3.0.3
info:
  title: Widgets
  version: '1'
paths: {}
components:
  schemas:
    Tags:
      type: array
      items:
        type: string
    Color:
      type: string
      enum: [red, green]
    Widget:
      type: object
      required: [label]
      properties:
        label:
          type: string
          minLength: 1
          maxLength: 20
        weight:
          type: number
          minimum: 0
          exclusiveMinimum: true
        sizes:
          type: array
          items:
            type: string
            enum: [small, large]
        color:
          $ref: '#/components/schemas/Color'
";

pub(super) fn definition_from(yaml: &str) -> OpenApiDefinition {
  let value = document::parse_str(yaml, DocumentFormat::Yaml).expect("fixture should parse");
  OpenApiDefinition::from_document(value, ExtractionConfig::default()).expect("fixture should extract")
}

pub(super) fn render(emitter: &dyn Emitter, yaml: &str, concurrency: Concurrency) -> HashMap<&'static str, String> {
  let options = EmitOptions {
    concurrency,
    source: "petstore.yaml".to_string(),
  };
  emitter
    .emit(&definition_from(yaml), &options)
    .expect("emitter should render the fixture")
    .into_iter()
    .map(|file| (file.name, file.content))
    .collect()
}

/// Asserts `needle` occurs in `haystack`, printing the rendered file on failure.
pub(super) fn assert_contains(haystack: &str, needle: &str) {
  assert!(haystack.contains(needle), "expected to find:\n{needle}\n\nin:\n{haystack}");
}

pub(super) fn position(haystack: &str, needle: &str) -> usize {
  haystack
    .find(needle)
    .unwrap_or_else(|| panic!("expected to find {needle:?} in:\n{haystack}"))
}
