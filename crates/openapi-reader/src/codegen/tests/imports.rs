use serde_json::json;

use crate::codegen::{Framework, ImportSet, assemble, python_literal};

#[test]
fn test_import_set_sorts_and_deduplicates() {
  let mut imports = ImportSet::new();
  imports.name("typing", "Optional");
  imports.name(".models", "Pet");
  imports.name("fastapi", "Query");
  imports.name("typing", "Any");
  imports.name("fastapi", "APIRouter");
  imports.name("typing", "Optional");

  assert_eq!(
    imports.render(),
    "from fastapi import APIRouter, Query\nfrom typing import Any, Optional\nfrom .models import Pet"
  );
}

#[test]
fn test_empty_import_set_renders_nothing() {
  let imports = ImportSet::new();
  assert!(imports.is_empty());
  assert_eq!(imports.render(), "");
  assert_eq!(
    assemble("api.yaml", &imports, "\n\nx = 1\n"),
    "# Generated by openapi-reader from api.yaml. Do not edit by hand.\n\n\nx = 1\n"
  );
}

#[test]
fn test_assemble_separates_header_imports_and_body() {
  let mut imports = ImportSet::new();
  imports.name("rest_framework", "serializers");
  assert_eq!(
    assemble("api.json", &imports, "class A:\n    pass"),
    "# Generated by openapi-reader from api.json. Do not edit by hand.\n\nfrom rest_framework import serializers\n\n\nclass A:\n    pass\n"
  );
}

#[test]
fn test_python_literal() {
  assert_eq!(python_literal(&json!(null)), "None");
  assert_eq!(python_literal(&json!(true)), "True");
  assert_eq!(python_literal(&json!(false)), "False");
  assert_eq!(python_literal(&json!(3)), "3");
  assert_eq!(python_literal(&json!(1.5)), "1.5");
  assert_eq!(python_literal(&json!("sold")), "\"sold\"");
  assert_eq!(python_literal(&json!([1, "a"])), "[1, \"a\"]");
  assert_eq!(python_literal(&json!({"k": null})), "{\"k\": None}");
}

#[test]
fn test_framework_picks_its_emitter() {
  for framework in [Framework::Drf, Framework::Fastapi] {
    assert_eq!(framework.emitter().framework(), framework);
  }
  assert_eq!(Framework::Drf.to_string(), "drf");
  assert_eq!(Framework::Fastapi.to_string(), "fastapi");
}
