use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::{Map, Value};

use crate::{
  config::ExtractionConfig,
  diagnostics::Diagnostic,
  error::Result,
  model::{Constraints, Property, PropertyRef, SemanticType},
  refs,
  resolver::{self, SchemaResolver},
  type_mapper,
};

/// Builds the properties of a schema object against the declared component schemas.
///
/// This is a one-shot entry point with the default (strict) reference policy. Extraction passes
/// use [`SchemaResolver::build_properties`] so schemas are shared across the whole document.
pub fn build_properties(schema_object: &Value, all_schemas: &Map<String, Value>) -> Result<Vec<Property>> {
  SchemaResolver::from_schemas(all_schemas, ExtractionConfig::default()).build_properties(schema_object, "")
}

impl SchemaResolver<'_> {
  /// One [`Property`] per entry of the definition's `properties`, in declaration order.
  pub fn build_properties(&mut self, definition: &Value, owner: &str) -> Result<Vec<Property>> {
    let Some(declared) = definition.get("properties").and_then(Value::as_object) else {
      return Ok(vec![]);
    };

    declared
      .iter()
      .map(|(name, property)| {
        let location = if owner.is_empty() {
          name.clone()
        } else {
          format!("{owner}.{name}")
        };
        self.build_property(name, property, &location)
      })
      .collect()
  }

  pub fn build_property(&mut self, name: &str, definition: &Value, location: &str) -> Result<Property> {
    let (declared, nullable) = type_mapper::declared_type(definition);
    let format = type_mapper::format_of(definition);
    let mut kind = type_mapper::map_type(declared, format);

    if kind.is_none()
      && let Some(declared) = declared
      && declared != "object"
    {
      self.diagnose(Diagnostic::UnknownPrimitiveType {
        location: location.to_string(),
        declared: declared.to_string(),
        format: format.unwrap_or_default().to_string(),
      });
    }

    let mut reference = None;
    if kind == Some(SemanticType::Array) {
      reference = Some(self.resolve_item(definition.get("items"), location)?);
    }

    let mut related = IndexSet::new();
    if let Some(ref_path) = refs::ref_of(definition).or_else(|| refs::single_composed_ref(definition)) {
      let resolved = self.resolve_ref(ref_path, location)?;
      kind = resolved.as_ref().map(|_| SemanticType::ObjectReference);
      reference = resolved.map(PropertyRef::Schema);
    } else if kind.is_none() && has_fields(definition) {
      let schema = self.build_schema("", definition, location)?;
      kind = Some(SemanticType::ObjectReference);
      reference = Some(PropertyRef::Schema(Arc::new(schema)));
    } else {
      self.unmodelled_members(definition, location, &mut related)?;
    }

    let enum_values = definition
      .get("enum")
      .and_then(Value::as_array)
      .cloned()
      .unwrap_or_default();
    if !enum_values.is_empty() {
      kind = Some(SemanticType::Enum);
    }

    Ok(
      Property::builder()
        .name(name)
        .maybe_example(definition.get("example").cloned())
        .maybe_kind(kind)
        .enum_values(enum_values)
        .maybe_reference(reference)
        .maybe_description(resolver::description_of(definition))
        .maybe_format(format.map(String::from))
        .maybe_default(definition.get("default").cloned())
        .nullable(nullable)
        .constraints(Constraints::from_definition(definition))
        .related(related.into_iter().collect())
        .build(),
    )
  }

  /// Resolves an array's `items`.
  ///
  /// A `$ref` or an inline object yields a schema; a bare type declaration yields an anonymous
  /// property, which may itself be an array. A missing or unresolvable item still produces an
  /// untyped anonymous property, so every array keeps a reference.
  pub fn resolve_item(&mut self, items: Option<&Value>, location: &str) -> Result<PropertyRef> {
    let untyped = || PropertyRef::Property(Box::new(Property::anonymous(None)));
    let location = format!("{location}[]");

    let Some(items) = items else {
      self.diagnose(Diagnostic::MissingArrayItems { location });
      return Ok(untyped());
    };

    if let Some(ref_path) = refs::ref_of(items).or_else(|| refs::single_composed_ref(items)) {
      return Ok(self.resolve_ref(ref_path, &location)?.map_or_else(untyped, PropertyRef::Schema));
    }

    if has_fields(items) {
      let schema = self.build_schema("", items, &location)?;
      return Ok(PropertyRef::Schema(Arc::new(schema)));
    }

    let item = self.build_property("", items, &location)?;
    Ok(PropertyRef::Property(Box::new(item)))
  }
}

/// An inline object that declares its own fields, directly or by merging `allOf` members.
fn has_fields(definition: &Value) -> bool {
  let declares_fields = definition
    .get("properties")
    .and_then(Value::as_object)
    .is_some_and(|fields| !fields.is_empty());
  declares_fields || !resolver::all_of_members(definition).is_empty()
}
