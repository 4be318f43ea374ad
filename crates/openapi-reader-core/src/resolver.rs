//! Reference resolution over `components`.
//!
//! [`SchemaResolver`] builds component schemas on demand, memoises them so a schema referenced
//! many times is built once and shared, and keeps a stack of the schemas currently being built so
//! a reference back into that stack is reported as a cycle instead of recursing forever.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};

use crate::{
  config::ExtractionConfig,
  diagnostics::Diagnostic,
  document,
  error::{ExtractionError, Result},
  model::{Property, Schema, SchemaKind},
  refs::{self, ComponentKind},
  type_mapper,
};

#[derive(Debug)]
pub struct SchemaResolver<'doc> {
  schemas: &'doc Map<String, Value>,
  components: Option<&'doc Map<String, Value>>,
  config: ExtractionConfig,
  built: IndexMap<String, Arc<Schema>>,
  resolving: IndexSet<String>,
  diagnostics: Vec<Diagnostic>,
}

impl<'doc> SchemaResolver<'doc> {
  /// A resolver over the `components` section of a parsed document.
  pub fn new(document: &'doc Value, config: ExtractionConfig) -> Result<Self> {
    let mut resolver = Self::from_schemas(document::component_schemas(document)?, config);
    resolver.components = document::components(document);
    Ok(resolver)
  }

  /// A resolver over a bare `components.schemas` mapping, without parameter, body or response
  /// components to follow.
  pub fn from_schemas(schemas: &'doc Map<String, Value>, config: ExtractionConfig) -> Self {
    Self {
      schemas,
      components: None,
      config,
      built: IndexMap::new(),
      resolving: IndexSet::new(),
      diagnostics: vec![],
    }
  }

  /// Seeds the memo with schemas an earlier pass already built, so references resolve to the same
  /// shared instances.
  #[must_use]
  pub fn with_known(mut self, built: IndexMap<String, Arc<Schema>>) -> Self {
    self.built = built;
    self
  }

  pub fn config(&self) -> ExtractionConfig {
    self.config
  }

  /// Declared component schema names, in document order.
  pub fn declared_names(&self) -> impl Iterator<Item = &'doc String> + use<'doc> {
    let schemas = self.schemas;
    schemas.keys()
  }

  pub fn built(&self) -> &IndexMap<String, Arc<Schema>> {
    &self.built
  }

  pub fn diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }

  pub fn into_parts(self) -> (IndexMap<String, Arc<Schema>>, Vec<Diagnostic>) {
    (self.built, self.diagnostics)
  }

  pub(crate) fn diagnose(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic);
  }

  /// Resolves a `#/components/schemas/<name>` pointer.
  ///
  /// Returns `Ok(None)` only under the lenient reference policy, after recording a diagnostic.
  pub fn resolve_ref(&mut self, ref_path: &str, location: &str) -> Result<Option<Arc<Schema>>> {
    match refs::parse_schema_ref_path(ref_path) {
      Some(name) if self.schemas.contains_key(&name) => self.resolve_schema(&name),
      _ => self.unresolved(ref_path, location),
    }
  }

  /// Returns the schema named `name`, building it (and everything it references) on first use.
  pub fn resolve_schema(&mut self, name: &str) -> Result<Option<Arc<Schema>>> {
    if let Some(schema) = self.built.get(name) {
      return Ok(Some(Arc::clone(schema)));
    }

    if let Some(start) = self.resolving.get_index_of(name) {
      let mut cycle: Vec<String> = self.resolving.iter().skip(start).cloned().collect();
      cycle.push(name.to_string());
      return Err(ExtractionError::CyclicSchemaReference { cycle });
    }

    let schemas = self.schemas;
    let Some(definition) = schemas.get(name) else {
      return self.unresolved(&format!("{}{name}", refs::SCHEMA_REF_PREFIX), name);
    };

    self.resolving.insert(name.to_string());
    let built = self.build_schema(name, definition, name);
    self.resolving.pop();

    let schema = Arc::new(built?);
    self.built.insert(name.to_string(), Arc::clone(&schema));
    Ok(Some(schema))
  }

  /// Builds a schema from its definition.
  ///
  /// Object definitions contribute one property per entry under `properties`, after the fields of
  /// every `allOf` member. Anything else (an array, a scalar, an enum or a plain alias of another
  /// schema) becomes a wrapper holding a single unnamed property that describes the whole value.
  pub fn build_schema(&mut self, name: &str, definition: &Value, location: &str) -> Result<Schema> {
    let (declared, nullable) = type_mapper::declared_type(definition);
    let kind = SchemaKind::from_declared(declared);

    let mut related = IndexSet::new();
    let (properties, required) = if is_object_definition(definition) {
      self.object_fields(definition, location, &mut related)?
    } else {
      (vec![self.build_property("", definition, location)?], required_of(definition))
    };

    Ok(
      Schema::builder()
        .name(name)
        .properties(properties)
        .kind(kind)
        .required(required)
        .maybe_description(description_of(definition))
        .nullable(nullable)
        .related(related.into_iter().collect())
        .build(),
    )
  }

  fn object_fields(
    &mut self,
    definition: &Value,
    location: &str,
    related: &mut IndexSet<String>,
  ) -> Result<(Vec<Property>, Vec<String>)> {
    let mut properties = vec![];
    let mut required = vec![];

    for (index, member) in all_of_members(definition).iter().enumerate() {
      let member_location = format!("{location}.allOf[{index}]");
      let part = match refs::ref_of(member) {
        Some(ref_path) => match self.resolve_ref(ref_path, &member_location)? {
          Some(parent) => {
            related.insert(parent.name.clone());
            parent
          }
          None => continue,
        },
        None => {
          let inline = self.build_schema("", member, &member_location)?;
          related.extend(inline.related.iter().cloned());
          Arc::new(inline)
        }
      };
      merge_fields(&mut properties, &mut required, &part.properties, &part.required);
    }

    let own = self.build_properties(definition, location)?;
    merge_fields(&mut properties, &mut required, &own, &required_of(definition));

    self.unmodelled_members(definition, location, related)?;
    Ok((properties, required))
  }

  /// Records `oneOf`/`anyOf` alternatives and structured `additionalProperties` values, which the
  /// model cannot represent, as a diagnostic and keeps the schemas they name in `related`.
  pub(crate) fn unmodelled_members(
    &mut self,
    definition: &Value,
    location: &str,
    related: &mut IndexSet<String>,
  ) -> Result<()> {
    for (keyword, members) in unmodelled(definition) {
      for (index, member) in members.into_iter().enumerate() {
        let member = self.build_property("", member, &format!("{location}.{keyword}[{index}]"))?;
        member.collect_refs(related);
      }
      self.diagnose(Diagnostic::UnsupportedComposition {
        location: location.to_string(),
        keyword: keyword.to_string(),
      });
    }
    Ok(())
  }

  /// Follows `$ref`s into `#/components/<kind>` until a concrete object is reached.
  ///
  /// Used for request bodies, responses and parameters, which may be declared once under
  /// `components` and referenced from many operations.
  pub(crate) fn follow<'v>(&mut self, value: &'v Value, kind: ComponentKind, location: &str) -> Result<Option<&'v Value>>
  where
    'doc: 'v,
  {
    let mut current = value;
    let mut seen: IndexSet<String> = IndexSet::new();

    while let Some(ref_path) = refs::ref_of(current) {
      let target = refs::parse_component_ref(ref_path)
        .filter(|component| component.kind == kind)
        .and_then(|component| self.component(kind, &component.name));
      let Some(target) = target else {
        return self.unresolved(ref_path, location);
      };

      if !seen.insert(ref_path.to_string()) {
        let mut cycle: Vec<String> = seen.into_iter().collect();
        cycle.push(ref_path.to_string());
        return Err(ExtractionError::CyclicSchemaReference { cycle });
      }
      current = target;
    }

    Ok(Some(current))
  }

  fn component(&self, kind: ComponentKind, name: &str) -> Option<&'doc Value> {
    self.components?.get(&kind.to_string())?.get(name)
  }

  fn unresolved<T>(&mut self, reference: &str, location: &str) -> Result<Option<T>> {
    if self.config.is_strict() {
      let reference = reference.to_string();
      let context = location.to_string();
      return Err(if refs::is_external_ref(&reference) {
        ExtractionError::UnsupportedReference { reference, context }
      } else {
        ExtractionError::UnresolvableReference { reference, context }
      });
    }

    self.diagnose(Diagnostic::UnresolvedReference {
      location: location.to_string(),
      reference: reference.to_string(),
    });
    Ok(None)
  }
}

/// Whether a definition describes an object with named fields rather than a single value.
///
/// A definition without a `type` counts as an object unless it is a reference, a composed
/// reference or an enum.
pub(crate) fn is_object_definition(definition: &Value) -> bool {
  if definition.get("properties").is_some() || !all_of_members(definition).is_empty() {
    return true;
  }

  let (declared, _) = type_mapper::declared_type(definition);
  matches!(declared, None | Some("object"))
    && refs::ref_of(definition).is_none()
    && refs::single_composed_ref(definition).is_none()
    && definition.get("enum").is_none()
}

/// Members of an `allOf` with more than one entry. A single-entry `allOf` is an annotated
/// reference and is handled by [`refs::single_composed_ref`].
pub(crate) fn all_of_members(definition: &Value) -> &[Value] {
  match definition.get("allOf").and_then(Value::as_array) {
    Some(members) if members.len() > 1 => members,
    _ => &[],
  }
}

/// `oneOf`/`anyOf` with several alternatives, and an `additionalProperties` value that is more
/// than a scalar. Maps of scalars stay free-form objects.
fn unmodelled(definition: &Value) -> Vec<(&'static str, Vec<&Value>)> {
  let mut found = vec![];
  for keyword in ["oneOf", "anyOf"] {
    if let Some(members) = definition.get(keyword).and_then(Value::as_array)
      && members.len() > 1
    {
      found.push((keyword, members.iter().collect()));
    }
  }

  if let Some(value) = definition.get("additionalProperties")
    && value.as_object().is_some_and(|value| !value.is_empty())
    && !is_scalar_definition(value)
  {
    found.push(("additionalProperties", vec![value]));
  }
  found
}

fn is_scalar_definition(definition: &Value) -> bool {
  let (declared, _) = type_mapper::declared_type(definition);
  refs::ref_of(definition).is_none() && matches!(declared, Some("string" | "integer" | "number" | "boolean"))
}

fn required_of(definition: &Value) -> Vec<String> {
  definition
    .get("required")
    .and_then(Value::as_array)
    .map(|names| names.iter().filter_map(Value::as_str).map(String::from).collect())
    .unwrap_or_default()
}

/// Appends fields, letting a later declaration of the same name replace the earlier one in place.
fn merge_fields(
  properties: &mut Vec<Property>,
  required: &mut Vec<String>,
  extra: &[Property],
  extra_required: &[String],
) {
  for property in extra {
    match properties.iter_mut().find(|existing| existing.name == property.name) {
      Some(existing) => *existing = property.clone(),
      None => properties.push(property.clone()),
    }
  }
  for name in extra_required {
    if !required.contains(name) {
      required.push(name.clone());
    }
  }
}

pub(crate) fn description_of(definition: &Value) -> Option<String> {
  definition.get("description").and_then(Value::as_str).map(String::from)
}
