//! Django REST Framework output: `serializers.py` and `views.py`.

use std::iter;

use http::StatusCode;
use inflections::Inflect;
use itertools::Itertools;
use openapi_reader_core::{
  ApiPath, Method, OpenApiDefinition, Property, PropertyRef, ResponseKind, ResponseSchema, Schema, SchemaKind,
  SemanticType,
};

use super::{EmitOptions, Emitter, Framework, GeneratedFile, INDENT, ImportSet, assemble, docstring, python_literal};
use crate::naming::{python_string, to_python_class_name, to_python_field_name};

pub const SERIALIZERS_FILE: &str = "serializers.py";
pub const VIEWS_FILE: &str = "views.py";

#[derive(Debug, Clone, Copy, Default)]
pub struct DrfEmitter;

impl Emitter for DrfEmitter {
  fn framework(&self) -> Framework {
    Framework::Drf
  }

  fn emit(&self, definition: &OpenApiDefinition, options: &EmitOptions) -> anyhow::Result<Vec<GeneratedFile>> {
    Ok(vec![
      GeneratedFile {
        name: SERIALIZERS_FILE,
        content: render_serializers(definition, &options.source)?,
      },
      GeneratedFile {
        name: VIEWS_FILE,
        content: render_views(definition, &options.source),
      },
    ])
  }
}

pub(crate) fn serializer_name(schema_name: &str) -> String {
  format!("{}Serializer", to_python_class_name(schema_name))
}

fn render_serializers(definition: &OpenApiDefinition, source: &str) -> anyhow::Result<String> {
  let mut imports = ImportSet::new();
  imports.name("rest_framework", "serializers");

  let classes = definition
    .emission_order()?
    .into_iter()
    .map(|(name, schema)| serializer_class(name, schema))
    .join("\n\n\n");
  Ok(assemble(source, &imports, &classes))
}

fn serializer_class(name: &str, schema: &Schema) -> String {
  let class_name = serializer_name(name);

  if let [only] = schema.properties.as_slice()
    && only.name.is_empty()
  {
    return match (schema.kind, &only.reference) {
      (SchemaKind::Array, Some(reference)) => format!(
        "class {class_name}(serializers.ListSerializer):\n{INDENT}child = {}",
        element_field(reference)
      ),
      _ => format!(
        "class {class_name}(serializers.Serializer):\n{INDENT}value = {}",
        serializer_field(only, true)
      ),
    };
  }

  let mut lines = vec![format!("class {class_name}(serializers.Serializer):")];
  lines.extend(docstring(schema.description.as_deref(), INDENT));
  for property in &schema.properties {
    lines.push(format!(
      "{INDENT}{} = {}",
      to_python_field_name(&property.name),
      serializer_field(property, schema.is_required(&property.name))
    ));
  }
  if lines.len() == 1 {
    lines.push(format!("{INDENT}pass"));
  }
  lines.join("\n")
}

/// The serializer field declaration for one property, e.g. `serializers.CharField(required=False)`.
pub(crate) fn serializer_field(property: &Property, required: bool) -> String {
  let (class, mut args) = field_parts(property);
  if !required {
    args.push("required=False".to_string());
  }
  if property.nullable {
    args.push("allow_null=True".to_string());
  }
  format!("{class}({})", args.join(", "))
}

fn field_parts(property: &Property) -> (String, Vec<String>) {
  let field = |class: &str| format!("serializers.{class}");
  match property.kind {
    Some(SemanticType::Enum) => (
      field("ChoiceField"),
      vec![format!(
        "choices=[{}]",
        property.enum_values.iter().map(python_literal).join(", ")
      )],
    ),
    Some(SemanticType::String) if is_email(property) => (field("EmailField"), length_args(property)),
    Some(SemanticType::String) => (field("CharField"), length_args(property)),
    Some(SemanticType::Integer) => (field("IntegerField"), value_args(property)),
    Some(SemanticType::Float) => (field("FloatField"), value_args(property)),
    Some(SemanticType::Boolean) => (field("BooleanField"), vec![]),
    Some(SemanticType::Date) => (field("DateField"), vec![]),
    Some(SemanticType::DateTime) => (field("DateTimeField"), vec![]),
    Some(SemanticType::Array) => match &property.reference {
      Some(PropertyRef::Schema(schema)) if !schema.is_anonymous() => {
        (serializer_name(&schema.name), vec!["many=True".to_string()])
      }
      Some(reference) => (field("ListField"), vec![format!("child={}", element_field(reference))]),
      None => (field("ListField"), vec![]),
    },
    Some(SemanticType::ObjectReference) => match property.referenced_schema() {
      Some(schema) if !schema.is_anonymous() => (serializer_name(&schema.name), vec![]),
      _ => (field("DictField"), vec![]),
    },
    None => (field("JSONField"), vec![]),
  }
}

/// The field describing one element of a list.
fn element_field(reference: &PropertyRef) -> String {
  match reference {
    PropertyRef::Schema(schema) if !schema.is_anonymous() => format!("{}()", serializer_name(&schema.name)),
    PropertyRef::Schema(_) => "serializers.DictField()".to_string(),
    PropertyRef::Property(item) => serializer_field(item, true),
  }
}

fn is_email(property: &Property) -> bool {
  property.format.as_deref() == Some("email")
    || property.name.to_ascii_lowercase().contains("email")
    || property
      .example
      .as_ref()
      .and_then(|example| example.as_str())
      .is_some_and(|example| example.contains('@'))
}

fn length_args(property: &Property) -> Vec<String> {
  let constraints = &property.constraints;
  [
    constraints.min_length.map(|length| format!("min_length={length}")),
    constraints.max_length.map(|length| format!("max_length={length}")),
  ]
  .into_iter()
  .flatten()
  .collect()
}

fn value_args(property: &Property) -> Vec<String> {
  let constraints = &property.constraints;
  [
    constraints.minimum.as_ref().map(|bound| format!("min_value={bound}")),
    constraints.maximum.as_ref().map(|bound| format!("max_value={bound}")),
  ]
  .into_iter()
  .flatten()
  .collect()
}

/// `status.HTTP_<code>_<REASON>` as defined by `rest_framework.status`, or the bare number for codes
/// without a canonical reason phrase.
pub(crate) fn status_constant(code: StatusCode) -> String {
  let Some(reason) = code.canonical_reason() else {
    return code.as_u16().to_string();
  };
  let reason = reason.replace('\'', "").to_constant_case();
  format!("status.HTTP_{}_{reason}", code.as_u16())
}

fn render_views(definition: &OpenApiDefinition, source: &str) -> String {
  let mut imports = ImportSet::new();
  imports.name("rest_framework", "status");
  imports.name("rest_framework.decorators", "api_view");
  imports.name("rest_framework.response", "Response");

  let views = definition
    .paths()
    .iter()
    .filter_map(|path| view_function(path, &mut imports))
    .collect::<Vec<_>>();
  assemble(source, &imports, &views.join("\n\n\n"))
}

/// One `@api_view` function per path, named after its first operation.
fn view_function(path: &ApiPath, imports: &mut ImportSet) -> Option<String> {
  let first = path.methods.first()?;
  let name = to_python_field_name(&first.operation_id);
  let verbs = path
    .methods
    .iter()
    .map(|method| python_string(method.verb.as_method().as_str()))
    .join(", ");
  let params = iter::once("request".to_string())
    .chain(path.path_params().into_iter().map(to_python_field_name))
    .join(", ");

  let mut lines = vec![format!("@api_view([{verbs}])"), format!("def {name}({params}):")];
  for method in &path.methods {
    lines.extend(method_branch(method, imports));
  }
  Some(lines.join("\n"))
}

fn method_branch(method: &Method, imports: &mut ImportSet) -> Vec<String> {
  let body = INDENT.repeat(2);
  let success = status_constant(method.success_status());
  let failure = status_constant(method.failure_status());

  let mut lines = vec![format!(
    "{INDENT}if request.method == {}:",
    python_string(method.verb.as_method().as_str())
  )];
  if let Some(summary) = method.summary.as_deref().map(str::trim).filter(|summary| !summary.is_empty()) {
    lines.push(format!("{body}# {}", summary.replace('\n', " ")));
  }

  if method.verb.has_body() && method.has_request_body() {
    match request_serializer(method) {
      Some((serializer, many)) => {
        imports.name(".serializers", &serializer);
        let many = if many { ", many=True" } else { "" };
        lines.push(format!("{body}serializer = {serializer}(data=request.data{many})"));
        lines.push(format!("{body}if serializer.is_valid():"));
        lines.push(format!("{body}{INDENT}return Response(serializer.data, status={success})"));
        lines.push(format!("{body}return Response(serializer.errors, status={failure})"));
      }
      None => lines.push(format!("{body}return Response(request.data, status={success})")),
    }
  } else if let Some(response) = method.success_response() {
    match response_serializer(response) {
      Some((serializer, true)) => {
        imports.name(".serializers", &serializer);
        lines.push(format!("{body}values = []"));
        lines.push(format!("{body}serializer = {serializer}(values, many=True)"));
        lines.push(format!("{body}return Response(serializer.data, status={success})"));
      }
      Some((serializer, false)) => {
        imports.name(".serializers", &serializer);
        lines.push(format!("{body}data = {{}}"));
        lines.push(format!("{body}serializer = {serializer}(data)"));
        lines.push(format!("{body}return Response(serializer.data, status={success})"));
      }
      None => {
        let placeholder = if response.is_array() { "[]" } else { "{}" };
        lines.push(format!("{body}return Response({placeholder}, status={success})"));
      }
    }
  } else {
    lines.push(format!("{body}return Response(status={success})"));
  }
  lines
}

/// The serializer validating a request body, and whether it validates a list.
fn request_serializer(method: &Method) -> Option<(String, bool)> {
  let schema = &method.request_schema;
  if !schema.is_anonymous() {
    return Some((serializer_name(&schema.name), false));
  }
  if let [item] = schema.properties.as_slice()
    && item.name.is_empty()
    && item.is_array()
    && let Some(items) = item.referenced_schema()
    && !items.is_anonymous()
  {
    return Some((serializer_name(&items.name), true));
  }
  None
}

fn response_serializer(response: &ResponseSchema) -> Option<(String, bool)> {
  if response.schema.is_anonymous() {
    return None;
  }
  match response.kind {
    ResponseKind::Object => Some((serializer_name(&response.schema.name), false)),
    ResponseKind::ArrayOfObject => Some((serializer_name(&response.schema.name), true)),
    ResponseKind::ArrayOfScalar => None,
  }
}
