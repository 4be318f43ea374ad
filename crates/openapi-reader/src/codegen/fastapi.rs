//! FastAPI output: pydantic models in `models.py` and an `APIRouter` in `routes.py`.

use std::{
  collections::{BTreeSet, HashMap},
  sync::LazyLock,
};

use http::StatusCode;
use itertools::Itertools;
use openapi_reader_core::{
  Method, OpenApiDefinition, ParamLocation, Property, PropertyRef, QueryParam, ResponseKind, ResponseSchema, Schema,
  SemanticType,
};
use regex::{Captures, Regex};
use serde_json::Value;

use super::{EmitOptions, Emitter, Framework, GeneratedFile, INDENT, ImportSet, assemble, docstring, python_literal};
use crate::naming::{
  enum_class_name, ensure_unique, python_string, to_python_class_name, to_python_constant_name, to_python_field_name,
};

pub const MODELS_FILE: &str = "models.py";
pub const ROUTES_FILE: &str = "routes.py";

const MODELS_MODULE: &str = ".models";

static PATH_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct FastApiEmitter;

impl Emitter for FastApiEmitter {
  fn framework(&self) -> Framework {
    Framework::Fastapi
  }

  fn emit(&self, definition: &OpenApiDefinition, options: &EmitOptions) -> anyhow::Result<Vec<GeneratedFile>> {
    Ok(vec![
      GeneratedFile {
        name: MODELS_FILE,
        content: render_models(definition, &options.source)?,
      },
      GeneratedFile {
        name: ROUTES_FILE,
        content: render_routes(definition, options),
      },
    ])
  }
}

/// Spells property types as Python annotations, recording the imports they need.
struct TypeRenderer<'a> {
  imports: &'a mut ImportSet,
  /// Where model classes come from; `None` inside `models.py` itself.
  models_module: Option<&'static str>,
}

impl TypeRenderer<'_> {
  fn model(&mut self, schema_name: &str) -> String {
    let class = to_python_class_name(schema_name);
    if let Some(module) = self.models_module {
      self.imports.name(module, &class);
    }
    class
  }

  fn typing(&mut self, name: &str) -> String {
    self.imports.name("typing", name);
    name.to_string()
  }

  fn any_object(&mut self) -> String {
    format!("dict[str, {}]", self.typing("Any"))
  }

  fn optional(&mut self, annotation: &str) -> String {
    format!("{}[{annotation}]", self.typing("Optional"))
  }

  /// `enum_class` names the generated enum for an enum property (or for the items of an array of
  /// enum labels); without one, enum labels are spelled as a `Literal`.
  fn property_type(&mut self, property: &Property, enum_class: Option<&str>) -> String {
    match property.kind {
      Some(SemanticType::Enum) => match enum_class {
        Some(class) => class.to_string(),
        None => self.literal(property),
      },
      Some(SemanticType::String) => "str".to_string(),
      Some(SemanticType::Integer) => "int".to_string(),
      Some(SemanticType::Float) => "float".to_string(),
      Some(SemanticType::Boolean) => "bool".to_string(),
      Some(SemanticType::Date) => {
        self.imports.name("datetime", "date");
        "date".to_string()
      }
      Some(SemanticType::DateTime) => {
        self.imports.name("datetime", "datetime");
        "datetime".to_string()
      }
      Some(SemanticType::Array) => {
        let element = match &property.reference {
          Some(PropertyRef::Property(item)) => self.property_type(item, enum_class.filter(|_| item.is_enum())),
          Some(PropertyRef::Schema(schema)) => self.schema_type(schema),
          None => self.typing("Any"),
        };
        format!("list[{element}]")
      }
      Some(SemanticType::ObjectReference) => match property.referenced_schema() {
        Some(schema) => self.schema_type(schema),
        None => self.any_object(),
      },
      None => self.typing("Any"),
    }
  }

  fn literal(&mut self, property: &Property) -> String {
    let labels = property.enum_values.iter().map(python_literal).join(", ");
    format!("{}[{labels}]", self.typing("Literal"))
  }

  /// A named schema is its model class; an anonymous wrapper is its single property's type.
  fn schema_type(&mut self, schema: &Schema) -> String {
    if !schema.is_anonymous() {
      return self.model(&schema.name);
    }
    match schema.properties.as_slice() {
      [only] if only.name.is_empty() => self.property_type(only, None),
      _ => self.any_object(),
    }
  }

  fn response_type(&mut self, response: &ResponseSchema) -> String {
    let annotation = match response.kind {
      ResponseKind::Object => self.schema_type(&response.schema),
      ResponseKind::ArrayOfObject => format!("list[{}]", self.schema_type(&response.schema)),
      ResponseKind::ArrayOfScalar => match response.schema.properties.first() {
        Some(item) => format!("list[{}]", self.property_type(item, None)),
        None => format!("list[{}]", self.typing("Any")),
      },
    };
    if response.required {
      annotation
    } else {
      self.optional(&annotation)
    }
  }
}

struct EnumClass {
  name: String,
  description: Option<String>,
  values: Vec<Value>,
}

impl EnumClass {
  fn render(&self, imports: &mut ImportSet) -> String {
    imports.name("enum", "Enum");
    let base = if self.values.iter().all(Value::is_string) {
      "str, Enum"
    } else if self.values.iter().all(|value| value.is_i64() || value.is_u64()) {
      "int, Enum"
    } else {
      "Enum"
    };

    let mut lines = vec![format!("class {}({base}):", self.name)];
    lines.extend(docstring(self.description.as_deref(), INDENT));
    let mut members = BTreeSet::new();
    for value in &self.values {
      let label = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
      };
      let member = ensure_unique(&to_python_constant_name(&label), &members);
      lines.push(format!("{INDENT}{member} = {}", python_literal(value)));
      members.insert(member);
    }
    if self.values.is_empty() {
      lines.push(format!("{INDENT}pass"));
    }
    lines.join("\n")
  }
}

fn render_models(definition: &OpenApiDefinition, source: &str) -> anyhow::Result<String> {
  let order = definition.emission_order()?;
  let mut used: BTreeSet<String> = order.iter().map(|(name, _)| to_python_class_name(name)).collect();

  let mut imports = ImportSet::new();
  let mut blocks = vec![];
  for (name, schema) in order {
    blocks.extend(model_blocks(name, schema, &mut used, &mut imports));
  }
  Ok(assemble(source, &imports, &blocks.join("\n\n\n")))
}

/// The enum classes a schema needs followed by the schema's own class.
fn model_blocks(name: &str, schema: &Schema, used: &mut BTreeSet<String>, imports: &mut ImportSet) -> Vec<String> {
  let class_name = to_python_class_name(name);

  if let [only] = schema.properties.as_slice()
    && only.name.is_empty()
  {
    if only.is_enum() {
      let enum_class = EnumClass {
        name: class_name,
        description: schema.description.clone().or_else(|| only.description.clone()),
        values: only.enum_values.clone(),
      };
      return vec![enum_class.render(imports)];
    }
    return root_model_blocks(&class_name, only, used, imports);
  }

  let mut blocks = vec![];
  let mut enum_classes: HashMap<&str, String> = HashMap::new();
  for property in &schema.properties {
    let Some((target, is_array)) = enum_target(property) else {
      continue;
    };
    let enum_name = ensure_unique(&enum_class_name(name, &property.name, is_array), used);
    used.insert(enum_name.clone());
    let enum_class = EnumClass {
      name: enum_name.clone(),
      description: target.description.clone(),
      values: target.enum_values.clone(),
    };
    blocks.push(enum_class.render(imports));
    enum_classes.insert(property.name.as_str(), enum_name);
  }

  imports.name("pydantic", "BaseModel");
  let mut lines = vec![format!("class {class_name}(BaseModel):")];
  lines.extend(docstring(schema.description.as_deref(), INDENT));
  let header_len = lines.len();

  let mut aliased = false;
  let mut renderer = TypeRenderer {
    imports,
    models_module: None,
  };
  for property in &schema.properties {
    let enum_class = enum_classes.get(property.name.as_str()).map(String::as_str);
    let field = model_field(property, schema.is_required(&property.name), enum_class, &mut renderer);
    aliased |= field.aliased;
    lines.push(format!("{INDENT}{}", field.line));
  }

  if aliased {
    renderer.imports.name("pydantic", "ConfigDict");
    lines.insert(
      header_len,
      format!("{INDENT}model_config = ConfigDict(populate_by_name=True)\n"),
    );
  }
  if lines.len() == 1 {
    lines.push(format!("{INDENT}pass"));
  }
  blocks.push(lines.join("\n"));
  blocks
}

fn root_model_blocks(class_name: &str, only: &Property, used: &mut BTreeSet<String>, imports: &mut ImportSet) -> Vec<String> {
  let mut blocks = vec![];
  let enum_class = match enum_target(only) {
    Some((target, _)) => {
      let enum_name = ensure_unique(&format!("{class_name}Item"), used);
      used.insert(enum_name.clone());
      let enum_class = EnumClass {
        name: enum_name.clone(),
        description: target.description.clone(),
        values: target.enum_values.clone(),
      };
      blocks.push(enum_class.render(imports));
      Some(enum_name)
    }
    None => None,
  };

  imports.name("pydantic", "RootModel");
  let mut renderer = TypeRenderer {
    imports,
    models_module: None,
  };
  let annotation = renderer.property_type(only, enum_class.as_deref());
  blocks.push(format!("class {class_name}(RootModel[{annotation}]):\n{INDENT}pass"));
  blocks
}

/// The property whose labels become an enum class, and whether it is the item of an array.
fn enum_target(property: &Property) -> Option<(&Property, bool)> {
  if property.is_enum() {
    return Some((property, false));
  }
  property
    .item_property()
    .filter(|item| property.is_array() && item.is_enum())
    .map(|item| (item, true))
}

struct ModelField {
  line: String,
  aliased: bool,
}

fn model_field(
  property: &Property,
  required: bool,
  enum_class: Option<&str>,
  renderer: &mut TypeRenderer<'_>,
) -> ModelField {
  let name = to_python_field_name(&property.name);
  let mut annotation = renderer.property_type(property, enum_class);
  if !required || property.nullable {
    annotation = renderer.optional(&annotation);
  }

  let default = (!required).then(|| default_literal(property, enum_class));
  let aliased = name != property.name;

  let mut args: Vec<String> = vec![];
  if aliased {
    args.push(format!("alias={}", python_string(&property.name)));
  }
  args.extend(constraint_args(property));
  if let Some(description) = property.description.as_deref().filter(|text| !text.trim().is_empty()) {
    args.push(format!("description={}", python_string(description.trim())));
  }

  let line = match (default, args.is_empty()) {
    (None, true) => format!("{name}: {annotation}"),
    (Some(default), true) => format!("{name}: {annotation} = {default}"),
    (default, false) => {
      renderer.imports.name("pydantic", "Field");
      let args = default.map(|default| format!("default={default}")).into_iter().chain(args).join(", ");
      format!("{name}: {annotation} = Field({args})")
    }
  };
  ModelField { line, aliased }
}

fn default_literal(property: &Property, enum_class: Option<&str>) -> String {
  match (&property.default, enum_class) {
    (Some(default), Some(class)) if property.is_enum() => format!("{class}({})", python_literal(default)),
    (Some(default), _) if property.kind.is_some_and(|kind| kind.is_scalar()) => python_literal(default),
    _ => "None".to_string(),
  }
}

fn constraint_args(property: &Property) -> Vec<String> {
  let constraints = &property.constraints;
  let lower = if constraints.exclusive_minimum { "gt" } else { "ge" };
  let upper = if constraints.exclusive_maximum { "lt" } else { "le" };
  [
    constraints.min_length.map(|length| format!("min_length={length}")),
    constraints.max_length.map(|length| format!("max_length={length}")),
    constraints.minimum.as_ref().map(|bound| format!("{lower}={bound}")),
    constraints.maximum.as_ref().map(|bound| format!("{upper}={bound}")),
    constraints.multiple_of.as_ref().map(|step| format!("multiple_of={step}")),
  ]
  .into_iter()
  .flatten()
  .collect()
}

fn render_routes(definition: &OpenApiDefinition, options: &EmitOptions) -> String {
  let mut imports = ImportSet::new();
  imports.name("fastapi", "APIRouter");

  let mut blocks = vec!["router = APIRouter()".to_string()];
  for path in definition.paths() {
    for method in &path.methods {
      blocks.push(route_handler(&path.path, method, options, &mut imports));
    }
  }
  assemble(&options.source, &imports, &blocks.join("\n\n\n"))
}

/// Rewrites `{petId}` style segments to the handler's parameter names.
pub(crate) fn route_path(path: &str) -> String {
  PATH_PARAM_RE
    .replace_all(path, |caps: &Captures| format!("{{{}}}", to_python_field_name(&caps[1])))
    .into_owned()
}

fn route_handler(path: &str, method: &Method, options: &EmitOptions, imports: &mut ImportSet) -> String {
  let mut renderer = TypeRenderer {
    imports,
    models_module: Some(MODELS_MODULE),
  };

  let status = method.success_status();
  let mut decorator_args = vec![python_string(&route_path(path))];
  if status != StatusCode::NO_CONTENT
    && let Some(response) = method.success_response()
  {
    decorator_args.push(format!("response_model={}", renderer.response_type(response)));
  }
  decorator_args.push(format!("status_code={}", status.as_u16()));
  decorator_args.push(format!("operation_id={}", python_string(&method.operation_id)));
  if !method.tags.is_empty() {
    decorator_args.push(format!(
      "tags=[{}]",
      method.tags.iter().map(String::as_str).map(python_string).join(", ")
    ));
  }

  // Arguments without a default must precede the ones that have one.
  let (mut positional, mut keyword): (Vec<String>, Vec<String>) = (vec![], vec![]);
  for param in &method.params {
    let (argument, has_default) = handler_param(param, &mut renderer);
    if has_default {
      keyword.push(argument);
    } else {
      positional.push(argument);
    }
  }
  if method.has_request_body() {
    let body = renderer.schema_type(&method.request_schema);
    if method.request_schema_required {
      positional.push(format!("body: {body}"));
    } else {
      keyword.push(format!("body: {} = None", renderer.optional(&body)));
    }
  }
  positional.append(&mut keyword);

  let mut lines = vec![
    format!("@router.{}({})", method.verb, decorator_args.join(", ")),
    format!(
      "{} {}({}):",
      options.concurrency.def_keyword(),
      to_python_field_name(&method.operation_id),
      positional.join(", ")
    ),
  ];
  lines.extend(docstring(method.summary.as_deref(), INDENT));
  lines.push(format!("{INDENT}raise NotImplementedError"));
  lines.join("\n")
}

/// One handler argument and whether it carries a default.
fn handler_param(param: &QueryParam, renderer: &mut TypeRenderer<'_>) -> (String, bool) {
  let name = to_python_field_name(&param.name);
  let mut annotation = match param.property() {
    Some(property) => renderer.property_type(property, None),
    None => renderer.typing("Any"),
  };
  if !param.required {
    annotation = renderer.optional(&annotation);
  }

  let is_list = param.property().is_some_and(Property::is_array);
  let marker = match param.location {
    ParamLocation::Path => None,
    ParamLocation::Query if name != param.name || is_list => Some("Query"),
    ParamLocation::Query => None,
    ParamLocation::Header => Some("Header"),
    ParamLocation::Cookie => Some("Cookie"),
  };

  let Some(marker) = marker else {
    return if param.required {
      (format!("{name}: {annotation}"), false)
    } else {
      (format!("{name}: {annotation} = None"), true)
    };
  };

  renderer.imports.name("fastapi", marker);
  let mut args = vec![];
  if !param.required {
    args.push("default=None".to_string());
  }
  if name != param.name || param.location == ParamLocation::Header {
    args.push(format!("alias={}", python_string(&param.name)));
  }
  (format!("{name}: {annotation} = {marker}({})", args.join(", ")), true)
}
