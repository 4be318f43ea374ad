//! Binds every operation under `paths` to the schemas the registry built.

use std::sync::Arc;

use indexmap::IndexMap;
use inflections::Inflect;
use oas3::spec::ParameterIn;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
  diagnostics::Diagnostic,
  error::{ExtractionError, Result},
  model::{
    ApiPath, HttpVerb, Method, ParamLocation, Property, PropertyRef, QueryParam, ResponseKind, ResponseSchema, Schema,
    SchemaKind,
  },
  refs::{self, ComponentKind},
  resolver::{self, SchemaResolver},
  type_mapper,
};

pub const JSON_MEDIA_TYPE: &str = "application/json";

const UNSUPPORTED_VERBS: &[&str] = &["head", "options", "trace"];

/// The subset of a parameter object the model keeps.
#[derive(Debug, Deserialize)]
struct RawParameter {
  name: String,
  #[serde(rename = "in")]
  location: ParameterIn,
  #[serde(default)]
  description: Option<String>,
  #[serde(default)]
  required: bool,
  #[serde(default)]
  explode: Option<bool>,
  #[serde(default)]
  schema: Option<Value>,
  #[serde(default)]
  example: Option<Value>,
}

/// Extracts every path in document order.
///
/// `resolver` must already know the registry's schemas (see [`SchemaResolver::with_known`]) so
/// operations share them instead of rebuilding them.
pub fn extract_paths<'doc>(
  raw_paths: &'doc Map<String, Value>,
  resolver: &mut SchemaResolver<'doc>,
) -> Result<Vec<ApiPath>> {
  raw_paths
    .iter()
    .map(|(path, item)| extract_path(path, item, resolver))
    .collect()
}

fn extract_path<'doc>(path: &str, item: &'doc Value, resolver: &mut SchemaResolver<'doc>) -> Result<ApiPath> {
  let item = item
    .as_object()
    .ok_or_else(|| ExtractionError::not_a_mapping(format!("paths.{path}")))?;
  let shared_params = item.get("parameters");

  let mut methods = vec![];
  for (key, operation) in item {
    if let Ok(verb) = key.parse::<HttpVerb>() {
      methods.push(build_method(path, verb, operation, shared_params, resolver)?);
    } else if UNSUPPORTED_VERBS.contains(&key.as_str()) {
      resolver.diagnose(Diagnostic::UnsupportedOperation {
        path: path.to_string(),
        verb: key.to_uppercase(),
      });
    }
  }

  Ok(ApiPath {
    path: path.to_string(),
    methods,
  })
}

fn build_method<'doc>(
  path: &str,
  verb: HttpVerb,
  operation: &'doc Value,
  shared_params: Option<&'doc Value>,
  resolver: &mut SchemaResolver<'doc>,
) -> Result<Method> {
  let context = format!("{} {path}", verb.as_method());

  let operation_id = operation
    .get("operationId")
    .and_then(Value::as_str)
    .map_or_else(|| synthesize_operation_id(verb, path), String::from);
  let tags = operation
    .get("tags")
    .and_then(Value::as_array)
    .map(|tags| tags.iter().filter_map(Value::as_str).map(String::from).collect())
    .unwrap_or_default();
  let summary = operation.get("summary").and_then(Value::as_str).map(String::from);

  let (request_schema, request_schema_required) = request_body(operation.get("requestBody"), &context, resolver)?;
  let responses = responses(operation.get("responses"), &context, resolver)?;
  let params = parameters(shared_params, operation.get("parameters"), &context, resolver)?;

  Ok(Method {
    operation_id,
    verb,
    request_schema,
    request_schema_required,
    responses,
    tags,
    params,
    summary,
    default_status: resolver.config().default_status,
  })
}

fn request_body<'doc>(
  body: Option<&'doc Value>,
  context: &str,
  resolver: &mut SchemaResolver<'doc>,
) -> Result<(Arc<Schema>, bool)> {
  let location = format!("{context} requestBody");
  let empty = || Arc::new(Schema::empty());

  let Some(body) = body else {
    return Ok((empty(), false));
  };
  let Some(body) = resolver.follow(body, ComponentKind::RequestBodies, &location)? else {
    return Ok((empty(), false));
  };

  let required = body.get("required").and_then(Value::as_bool).unwrap_or(false);
  let Some(definition) = json_schema(body, &location, resolver) else {
    return Ok((empty(), required));
  };

  let schema = match refs::ref_of(definition) {
    Some(ref_path) => resolver.resolve_ref(ref_path, &location)?.unwrap_or_else(empty),
    None => Arc::new(resolver.build_schema("", definition, &location)?),
  };
  Ok((schema, required))
}

fn responses<'doc>(
  declared: Option<&'doc Value>,
  context: &str,
  resolver: &mut SchemaResolver<'doc>,
) -> Result<IndexMap<String, Option<ResponseSchema>>> {
  let Some(declared) = declared.and_then(Value::as_object) else {
    return Ok(IndexMap::new());
  };

  let mut responses = IndexMap::with_capacity(declared.len());
  for (status, response) in declared {
    let location = format!("{context} responses.{status}");
    let bound = match resolver.follow(response, ComponentKind::Responses, &location)? {
      Some(response) => response_schema(response, &location, resolver)?,
      None => None,
    };
    responses.insert(status.clone(), bound);
  }
  Ok(responses)
}

fn response_schema(
  response: &Value,
  location: &str,
  resolver: &mut SchemaResolver<'_>,
) -> Result<Option<ResponseSchema>> {
  let Some(definition) = json_schema(response, location, resolver) else {
    return Ok(None);
  };
  let description = resolver::description_of(response);
  let (declared, nullable) = type_mapper::declared_type(definition);

  let bound = if let Some(ref_path) = refs::ref_of(definition).or_else(|| refs::single_composed_ref(definition)) {
    resolver
      .resolve_ref(ref_path, location)?
      .map(|schema| (ResponseKind::Object, schema))
  } else if declared == Some("array") {
    array_response(definition.get("items"), location, resolver)?
  } else {
    Some((
      ResponseKind::Object,
      Arc::new(resolver.build_schema("", definition, location)?),
    ))
  };

  Ok(bound.map(|(kind, schema)| ResponseSchema {
    required: !(nullable || schema.nullable),
    kind,
    schema,
    description,
  }))
}

fn array_response(
  items: Option<&Value>,
  location: &str,
  resolver: &mut SchemaResolver<'_>,
) -> Result<Option<(ResponseKind, Arc<Schema>)>> {
  let item = match resolver.resolve_item(items, location)? {
    PropertyRef::Schema(schema) => return Ok(Some((ResponseKind::ArrayOfObject, schema))),
    PropertyRef::Property(item) => *item,
  };

  let wrapper = Schema::builder().properties(vec![item]).kind(SchemaKind::Array).build();
  Ok(Some((ResponseKind::ArrayOfScalar, Arc::new(wrapper))))
}

/// The `application/json` schema of a request body or response.
///
/// A body declared only under other media types is reported and treated as absent.
fn json_schema<'v>(holder: &'v Value, location: &str, resolver: &mut SchemaResolver<'_>) -> Option<&'v Value> {
  let content = holder.get("content")?.as_object()?;
  if content.is_empty() {
    return None;
  }

  let json = content
    .iter()
    .find(|(media_type, _)| is_json_media_type(media_type))
    .map(|(_, media)| media);
  match json {
    Some(media) => media.get("schema"),
    None => {
      resolver.diagnose(Diagnostic::UnsupportedMediaType {
        location: location.to_string(),
        media_types: content.keys().map(String::as_str).collect::<Vec<_>>().join(", "),
      });
      None
    }
  }
}

fn is_json_media_type(media_type: &str) -> bool {
  media_type
    .split(';')
    .next()
    .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(JSON_MEDIA_TYPE))
}

/// Path-level parameters followed by operation-level ones; an operation parameter with the same
/// name and location replaces the path-level one in place.
fn parameters<'doc>(
  shared: Option<&'doc Value>,
  own: Option<&'doc Value>,
  context: &str,
  resolver: &mut SchemaResolver<'doc>,
) -> Result<Vec<QueryParam>> {
  let declared = [shared, own]
    .into_iter()
    .flatten()
    .filter_map(Value::as_array)
    .flatten();

  let mut merged: IndexMap<(String, ParamLocation), QueryParam> = IndexMap::new();
  for (index, raw) in declared.enumerate() {
    let location = format!("{context} parameters[{index}]");
    let Some(raw) = resolver.follow(raw, ComponentKind::Parameters, &location)? else {
      continue;
    };
    let param = build_param(raw, &location, resolver)?;
    merged.insert((param.name.clone(), param.location), param);
  }
  Ok(merged.into_values().collect())
}

fn build_param(raw: &Value, location: &str, resolver: &mut SchemaResolver<'_>) -> Result<QueryParam> {
  let raw = RawParameter::deserialize(raw).map_err(|error| ExtractionError::MalformedDocument {
    key: location.to_string(),
    reason: error.to_string(),
  })?;
  let param_location = ParamLocation::from(raw.location);
  let location = format!("{location} {}", raw.name);

  let mut property = match &raw.schema {
    Some(definition) => resolver.build_property(&raw.name, definition, &location)?,
    None => Property::builder().name(raw.name.as_str()).build(),
  };
  if property.example.is_none() {
    property.example = raw.example;
  }
  if property.description.is_none() {
    property.description.clone_from(&raw.description);
  }

  Ok(QueryParam {
    description: raw.description.unwrap_or_default(),
    // Form-style parameters explode by default.
    explode: raw
      .explode
      .unwrap_or(matches!(param_location, ParamLocation::Query | ParamLocation::Cookie)),
    required: raw.required || param_location == ParamLocation::Path,
    location: param_location,
    name: raw.name,
    schema: Arc::new(Schema::builder().properties(vec![property]).build()),
  })
}

/// Builds an operation id for operations that do not declare one.
///
/// `GET /pet/{petId}` becomes `get_pet_by_pet_id`.
pub fn synthesize_operation_id(verb: HttpVerb, path: &str) -> String {
  let mut parts = vec![verb.to_string()];
  for segment in path.split('/').filter(|segment| !segment.is_empty()) {
    match segment.strip_prefix('{').and_then(|inner| inner.strip_suffix('}')) {
      Some(param) => parts.push(format!("by_{}", param.to_snake_case())),
      None => parts.push(segment.to_snake_case()),
    }
  }
  parts.join("_")
}
