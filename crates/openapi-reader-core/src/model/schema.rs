use indexmap::IndexSet;

use super::{Property, SchemaKind};

/// A named component schema, or an anonymous (empty-named) inline one.
///
/// Schemas are immutable once the extraction pass has built them and are shared through `Arc`
/// by every property, request and response that points at them.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
pub struct Schema {
  #[builder(into, default)]
  pub name: String,
  #[builder(default)]
  pub properties: Vec<Property>,
  #[builder(default)]
  pub kind: SchemaKind,
  /// Names from the definition's `required` list, in document order.
  #[builder(default)]
  pub required: Vec<String>,
  pub description: Option<String>,
  #[builder(default)]
  pub nullable: bool,
  /// Component schemas this one depends on outside its own properties: `allOf` parents, and
  /// `oneOf`/`anyOf` alternatives or map values the model has no shape for.
  #[builder(default)]
  pub related: Vec<String>,
}

impl Schema {
  /// The request schema of an operation without a body.
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn is_anonymous(&self) -> bool {
    self.name.is_empty()
  }

  pub fn is_empty(&self) -> bool {
    self.properties.is_empty()
  }

  /// A non-object declaration stored as a single unnamed property.
  pub fn is_wrapper(&self) -> bool {
    matches!(self.properties.as_slice(), [only] if only.name.is_empty())
  }

  pub fn is_required(&self, property_name: &str) -> bool {
    self.required.iter().any(|name| name == property_name)
  }

  pub fn property(&self, name: &str) -> Option<&Property> {
    self.properties.iter().find(|property| property.name == name)
  }

  /// Names of the component schemas this schema's properties point to.
  ///
  /// Anonymous inline schemas are looked through, so a property holding an inline object that
  /// references `Tag` contributes `Tag` here.
  pub fn refs(&self) -> IndexSet<String> {
    let mut refs = IndexSet::new();
    self.collect_refs(&mut refs);
    refs
  }

  pub(crate) fn collect_refs(&self, refs: &mut IndexSet<String>) {
    refs.extend(self.related.iter().cloned());
    for property in &self.properties {
      property.collect_refs(refs);
    }
  }
}
