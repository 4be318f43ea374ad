use std::sync::Arc;

use http::StatusCode;
use serde_json::json;

use super::support::{document_with, extract, extract_lenient, pet_schema, petstore_definition};
use crate::{
  Diagnostic, ExtractionError, OpenApiDefinition,
  config::ExtractionConfig,
  model::{ApiPath, HttpVerb, Method, ParamLocation, ResponseKind, SemanticType},
  paths::synthesize_operation_id,
};

fn path<'a>(definition: &'a OpenApiDefinition, url: &str) -> &'a ApiPath {
  definition
    .paths()
    .iter()
    .find(|path| path.path == url)
    .unwrap_or_else(|| panic!("path {url} should exist"))
}

fn method<'a>(definition: &'a OpenApiDefinition, url: &str, verb: HttpVerb) -> &'a Method {
  path(definition, url)
    .method(verb)
    .unwrap_or_else(|| panic!("{verb} {url} should exist"))
}

#[test]
fn test_list_pets_returns_array_of_pet() {
  let definition = extract(document_with(
    json!({ "Pet": pet_schema() }),
    json!({
      "/pets": {
        "get": {
          "operationId": "listPets",
          "responses": {
            "200": {
              "description": "A list of pets",
              "content": {
                "application/json": {
                  "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }
                }
              }
            }
          }
        }
      }
    }),
  ));

  assert_eq!(definition.paths().len(), 1);
  let pets = &definition.paths()[0];
  assert_eq!(pets.methods.len(), 1);

  let list = &pets.methods[0];
  assert_eq!(list.operation_id, "listPets");
  let success = list.success_response().expect("200 should have a body");
  assert_eq!(success.kind, ResponseKind::ArrayOfObject);
  assert!(success.is_array());
  assert_eq!(success.schema.name, "Pet");
  assert_eq!(success.description.as_deref(), Some("A list of pets"));
  assert_eq!(list.success_status(), StatusCode::OK);
  assert!(
    Arc::ptr_eq(&success.schema, &definition.created_schemas()["Pet"]),
    "responses share the registry's schema"
  );
}

#[test]
fn test_default_response_counts_as_success() {
  let definition = extract(document_with(
    json!({ "Pet": pet_schema() }),
    json!({
      "/pets": {
        "post": {
          "responses": {
            "default": {
              "description": "created",
              "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } }
            },
            "409": { "description": "conflict" }
          }
        }
      }
    }),
  ));

  let create = method(&definition, "/pets", HttpVerb::Post);
  assert_eq!(create.success_status(), StatusCode::OK);
  assert_eq!(create.success_response().map(|response| response.schema.name.as_str()), Some("Pet"));
  assert_eq!(create.failure_status(), StatusCode::CONFLICT);
}

#[test]
fn test_default_status_is_configurable() {
  let document = document_with(
    json!({}),
    json!({ "/ping": { "get": { "responses": { "default": { "description": "pong" } } } } }),
  );
  let config = ExtractionConfig::builder().default_status(StatusCode::ACCEPTED).build();
  let definition = OpenApiDefinition::from_document(document, config).unwrap();

  assert_eq!(method(&definition, "/ping", HttpVerb::Get).success_status(), StatusCode::ACCEPTED);
}

#[test]
fn test_status_without_content_is_none() {
  let definition = extract(document_with(
    json!({}),
    json!({
      "/pets/{id}": {
        "delete": {
          "responses": {
            "204": { "description": "deleted" },
            "404": { "description": "missing" }
          }
        }
      }
    }),
  ));

  let delete = method(&definition, "/pets/{id}", HttpVerb::Delete);
  assert_eq!(delete.responses.get("204"), Some(&None));
  assert_eq!(delete.success_response(), None);
  assert_eq!(delete.success_status(), StatusCode::NO_CONTENT);
  assert_eq!(delete.failure_status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_without_success_entries() {
  let definition = extract(document_with(
    json!({}),
    json!({ "/fail": { "get": { "responses": { "500": { "description": "boom" } } } } }),
  ));

  let fail = method(&definition, "/fail", HttpVerb::Get);
  assert_eq!(fail.success_response(), None);
  assert_eq!(fail.success_status(), StatusCode::OK, "no 2xx entry falls back to 200");
  assert_eq!(fail.failure_status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_failure_status_defaults_to_bad_request() {
  let definition = extract(document_with(
    json!({}),
    json!({ "/ok": { "get": { "responses": { "200": { "description": "fine" } } } } }),
  ));
  assert_eq!(method(&definition, "/ok", HttpVerb::Get).failure_status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_wildcard_status_keys() {
  let definition = extract(document_with(
    json!({ "Pet": pet_schema() }),
    json!({
      "/pets": {
        "get": {
          "responses": {
            "2XX": {
              "description": "ok",
              "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } }
            },
            "4XX": { "description": "client error" }
          }
        }
      }
    }),
  ));

  let get = method(&definition, "/pets", HttpVerb::Get);
  assert_eq!(get.success_status(), StatusCode::OK);
  assert!(get.success_response().is_some());
  assert_eq!(get.failure_status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_status_enum_parameter() {
  let definition = petstore_definition();
  let find = method(&definition, "/pet/findByStatus", HttpVerb::Get);

  assert_eq!(find.params.len(), 1);
  let status = &find.params[0];
  assert_eq!(status.name, "status");
  assert_eq!(status.location, ParamLocation::Query);
  assert!(!status.required);
  assert!(status.explode);
  assert_eq!(status.description, "Status values that need to be considered for filter");

  let property = status.property().expect("parameters wrap one property");
  assert_eq!(property.name, "status");
  assert_eq!(property.kind, Some(SemanticType::Enum));
  assert_eq!(property.enum_labels(), ["available", "pending", "sold"]);
  assert_eq!(property.default, Some(json!("available")));
}

#[test]
fn test_array_query_parameter() {
  let definition = petstore_definition();
  let find = method(&definition, "/pet/findByTags", HttpVerb::Get);

  let tags = find.params[0].property().unwrap();
  assert!(tags.is_array());
  assert_eq!(tags.item_property().and_then(|item| item.kind), Some(SemanticType::String));
}

#[test]
fn test_path_level_parameters_and_overrides() {
  let definition = petstore_definition();

  let get = method(&definition, "/pet/{petId}", HttpVerb::Get);
  assert_eq!(get.params.len(), 1);
  let pet_id = &get.params[0];
  assert_eq!(pet_id.location, ParamLocation::Path);
  assert!(pet_id.required);
  assert_eq!(pet_id.description, "ID of pet to return", "taken from components.parameters");
  assert_eq!(pet_id.property().and_then(|property| property.kind), Some(SemanticType::Integer));

  let update = method(&definition, "/pet/{petId}", HttpVerb::Post);
  let names: Vec<&str> = update.params.iter().map(|param| param.name.as_str()).collect();
  assert_eq!(names, ["petId", "name", "status"]);

  let delete = method(&definition, "/pet/{petId}", HttpVerb::Delete);
  let names: Vec<&str> = delete.params.iter().map(|param| param.name.as_str()).collect();
  assert_eq!(names, ["petId", "api_key"], "override keeps the path-level position");
  assert_eq!(delete.params[0].description, "Pet id to delete");
  assert_eq!(delete.params_in(ParamLocation::Header).count(), 1);

  let pet_path = path(&definition, "/pet/{petId}");
  assert_eq!(pet_path.path_params().into_iter().collect::<Vec<_>>(), ["petId"]);
  assert_eq!(pet_path.verbs(), [HttpVerb::Get, HttpVerb::Post, HttpVerb::Delete]);
}

#[test]
fn test_request_body_indirection() {
  let definition = petstore_definition();
  let pet = &definition.created_schemas()["Pet"];

  let add = method(&definition, "/pet", HttpVerb::Post);
  assert!(Arc::ptr_eq(&add.request_schema, pet));
  assert!(add.request_schema_required);

  let update = method(&definition, "/pet", HttpVerb::Put);
  assert!(Arc::ptr_eq(&update.request_schema, pet));
  assert!(update.request_schema_required);

  let place = method(&definition, "/store/order", HttpVerb::Post);
  assert_eq!(place.request_schema.name, "Order");
  assert!(!place.request_schema_required);
}

#[test]
fn test_response_indirection() {
  let definition = petstore_definition();
  let create = method(&definition, "/user", HttpVerb::Post);

  let response = create.success_response().expect("default response resolves through components");
  assert_eq!(response.schema.name, "User");
  assert_eq!(response.kind, ResponseKind::Object);
  assert!(response.required);
}

#[test]
fn test_methods_without_body() {
  let definition = petstore_definition();

  let get = method(&definition, "/pet/{petId}", HttpVerb::Get);
  assert!(!get.has_request_body());
  assert!(get.request_schema.is_anonymous());

  let update = method(&definition, "/pet/{petId}", HttpVerb::Post);
  assert!(!update.has_request_body());
}

#[test]
fn test_inline_array_body_is_wrapped() {
  let definition = petstore_definition();
  let create = method(&definition, "/user/createWithList", HttpVerb::Post);

  assert!(create.request_schema.is_wrapper());
  let body = &create.request_schema.properties[0];
  assert!(body.is_array());
  assert_eq!(body.referenced_schema().map(|schema| schema.name.as_str()), Some("User"));
  assert_eq!(create.responses.get("default"), Some(&None));
}

#[test]
fn test_inline_object_body() {
  let definition = extract(document_with(
    json!({}),
    json!({
      "/login": {
        "post": {
          "requestBody": {
            "required": true,
            "content": {
              "application/json": {
                "schema": {
                  "type": "object",
                  "required": ["username"],
                  "properties": { "username": { "type": "string" }, "password": { "type": "string" } }
                }
              }
            }
          },
          "responses": { "204": { "description": "logged in" } }
        }
      }
    }),
  ));

  let login = method(&definition, "/login", HttpVerb::Post);
  assert!(login.has_request_body());
  assert!(login.request_schema.is_anonymous());
  assert_eq!(login.request_schema.properties.len(), 2);
  assert!(login.request_schema.is_required("username"));
  assert!(login.request_schema_required);
}

#[test]
fn test_scalar_responses() {
  let definition = petstore_definition();

  let login = method(&definition, "/user/login", HttpVerb::Get);
  let token = login.success_response().expect("json content is picked among media types");
  assert_eq!(token.kind, ResponseKind::Object);
  assert!(token.schema.is_wrapper());
  assert_eq!(token.schema.properties[0].kind, Some(SemanticType::String));

  let inventory = method(&definition, "/store/inventory", HttpVerb::Get);
  let counts = inventory.success_response().unwrap();
  assert!(counts.schema.is_empty(), "free-form maps have no declared fields");
}

#[test]
fn test_array_of_scalars_response() {
  let definition = extract(document_with(
    json!({}),
    json!({
      "/names": {
        "get": {
          "responses": {
            "200": {
              "description": "names",
              "content": { "application/json": { "schema": { "type": "array", "items": { "type": "string" } } } }
            }
          }
        }
      }
    }),
  ));

  let names = method(&definition, "/names", HttpVerb::Get).success_response().unwrap();
  assert_eq!(names.kind, ResponseKind::ArrayOfScalar);
  assert!(names.schema.is_wrapper());
  assert_eq!(names.schema.properties[0].kind, Some(SemanticType::String));
}

#[test]
fn test_nullable_response_is_not_required() {
  let definition = extract(document_with(
    json!({ "Pet": pet_schema() }),
    json!({
      "/maybe": {
        "get": {
          "responses": {
            "200": {
              "description": "maybe a pet",
              "content": {
                "application/json": {
                  "schema": { "type": "object", "nullable": true, "properties": { "id": { "type": "integer" } } }
                }
              }
            }
          }
        }
      }
    }),
  ));

  let maybe = method(&definition, "/maybe", HttpVerb::Get).success_response().unwrap();
  assert!(!maybe.required);
}

#[test]
fn test_unsupported_media_type_is_reported() {
  let definition = petstore_definition();
  let upload = method(&definition, "/pet/{petId}/uploadImage", HttpVerb::Post);

  assert!(!upload.has_request_body());
  assert_eq!(
    definition.diagnostics(),
    [Diagnostic::UnsupportedMediaType {
      location: "POST /pet/{petId}/uploadImage requestBody".to_string(),
      media_types: "application/octet-stream".to_string(),
    }]
  );
}

#[test]
fn test_unsupported_verbs_are_skipped() {
  let definition = extract(document_with(
    json!({}),
    json!({
      "/health": {
        "head": { "responses": { "200": { "description": "up" } } },
        "get": { "responses": { "200": { "description": "up" } } }
      }
    }),
  ));

  assert_eq!(path(&definition, "/health").verbs(), [HttpVerb::Get]);
  assert_eq!(
    definition.diagnostics(),
    [Diagnostic::UnsupportedOperation {
      path: "/health".to_string(),
      verb: "HEAD".to_string(),
    }]
  );
}

#[test]
fn test_operation_id_synthesis() {
  assert_eq!(synthesize_operation_id(HttpVerb::Get, "/pet/{petId}"), "get_pet_by_pet_id");
  assert_eq!(synthesize_operation_id(HttpVerb::Post, "/pets"), "post_pets");
  assert_eq!(
    synthesize_operation_id(HttpVerb::Delete, "/store/order/{order-id}"),
    "delete_store_order_by_order_id"
  );
  assert_eq!(synthesize_operation_id(HttpVerb::Get, "/user/findByStatus"), "get_user_find_by_status");
  assert_eq!(synthesize_operation_id(HttpVerb::Get, "/"), "get");
  assert_eq!(
    synthesize_operation_id(HttpVerb::Get, "/HTTPServer/{userID}"),
    "get_httpserver_by_user_id"
  );

  let definition = extract(document_with(
    json!({}),
    json!({ "/pets/{petId}": { "get": { "responses": {} } } }),
  ));
  assert_eq!(method(&definition, "/pets/{petId}", HttpVerb::Get).operation_id, "get_pets_by_pet_id");
}

#[test]
fn test_missing_body_schema_is_fatal_when_strict() {
  let document = document_with(
    json!({}),
    json!({
      "/pets": {
        "post": {
          "requestBody": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } },
          "responses": {}
        }
      }
    }),
  );

  let error = OpenApiDefinition::from_document(document.clone(), ExtractionConfig::default()).unwrap_err();
  assert!(matches!(error, ExtractionError::UnresolvableReference { .. }), "unexpected error: {error}");

  let definition = extract_lenient(document);
  let create = method(&definition, "/pets", HttpVerb::Post);
  assert!(!create.has_request_body());
  assert!(definition.diagnostics()[0].is_degraded());
}

#[test]
fn test_schema_refs_of_method() {
  let definition = petstore_definition();
  let update = method(&definition, "/pet", HttpVerb::Put);
  let refs: Vec<String> = update.schema_refs().into_iter().collect();
  assert_eq!(refs, ["Pet", "Category", "Tag"]);
}
