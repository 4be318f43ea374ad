use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::{Number, Value};

use super::{Schema, SemanticType};

/// What a property points at besides its own scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyRef {
  /// A named component schema, or an anonymous inline object.
  Schema(Arc<Schema>),
  /// The item type of an array of scalars (or of nested arrays).
  Property(Box<Property>),
}

impl PropertyRef {
  pub fn as_schema(&self) -> Option<&Arc<Schema>> {
    match self {
      Self::Schema(schema) => Some(schema),
      Self::Property(_) => None,
    }
  }

  pub fn as_property(&self) -> Option<&Property> {
    match self {
      Self::Property(property) => Some(property),
      Self::Schema(_) => None,
    }
  }

  /// The name of the referenced schema, empty for anonymous schemas and item properties.
  pub fn name(&self) -> &str {
    match self {
      Self::Schema(schema) => &schema.name,
      Self::Property(property) => &property.name,
    }
  }

  pub(crate) fn collect_refs(&self, refs: &mut IndexSet<String>) {
    match self {
      Self::Schema(schema) if schema.is_anonymous() => schema.collect_refs(refs),
      Self::Schema(schema) => {
        refs.insert(schema.name.clone());
      }
      Self::Property(property) => property.collect_refs(refs),
    }
  }
}

/// Validation keywords carried over verbatim for emitters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraints {
  pub min_length: Option<u64>,
  pub max_length: Option<u64>,
  pub minimum: Option<Number>,
  pub maximum: Option<Number>,
  pub exclusive_minimum: bool,
  pub exclusive_maximum: bool,
  pub multiple_of: Option<Number>,
}

impl Constraints {
  /// Reads both the 3.0 (boolean flag) and 3.1 (numeric bound) spellings of the exclusive bounds.
  pub fn from_definition(definition: &Value) -> Self {
    let number = |key: &str| definition.get(key).and_then(Value::as_number).cloned();
    let length = |key: &str| definition.get(key).and_then(Value::as_u64);

    let mut constraints = Self {
      min_length: length("minLength"),
      max_length: length("maxLength"),
      minimum: number("minimum"),
      maximum: number("maximum"),
      multiple_of: number("multipleOf"),
      ..Self::default()
    };

    match definition.get("exclusiveMinimum") {
      Some(Value::Bool(flag)) => constraints.exclusive_minimum = *flag,
      Some(Value::Number(bound)) => {
        constraints.minimum = Some(bound.clone());
        constraints.exclusive_minimum = true;
      }
      _ => {}
    }
    match definition.get("exclusiveMaximum") {
      Some(Value::Bool(flag)) => constraints.exclusive_maximum = *flag,
      Some(Value::Number(bound)) => {
        constraints.maximum = Some(bound.clone());
        constraints.exclusive_maximum = true;
      }
      _ => {}
    }

    constraints
  }

  pub fn is_empty(&self) -> bool {
    *self == Self::default()
  }
}

/// One field of a [`Schema`].
///
/// `kind` is `None` when the declared type was absent or unrecognised. A non-empty `enum_values`
/// always comes with [`SemanticType::Enum`], and [`SemanticType::Array`] always comes with a
/// `reference` describing the items.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct Property {
  #[builder(into, default)]
  pub name: String,
  pub example: Option<Value>,
  pub kind: Option<SemanticType>,
  #[builder(default)]
  pub enum_values: Vec<Value>,
  pub reference: Option<PropertyRef>,
  pub description: Option<String>,
  pub format: Option<String>,
  pub default: Option<Value>,
  #[builder(default)]
  pub nullable: bool,
  #[builder(default)]
  pub constraints: Constraints,
  /// Component schemas named by `oneOf`/`anyOf` alternatives or `additionalProperties` values,
  /// which the property itself does not model.
  #[builder(default)]
  pub related: Vec<String>,
}

impl Property {
  /// An unnamed property, used for array items and synthesized bodies.
  pub fn anonymous(kind: Option<SemanticType>) -> Self {
    Self::builder().maybe_kind(kind).build()
  }

  pub fn is_enum(&self) -> bool {
    self.kind == Some(SemanticType::Enum)
  }

  pub fn is_array(&self) -> bool {
    self.kind == Some(SemanticType::Array)
  }

  pub fn referenced_schema(&self) -> Option<&Arc<Schema>> {
    self.reference.as_ref().and_then(PropertyRef::as_schema)
  }

  pub fn item_property(&self) -> Option<&Property> {
    self.reference.as_ref().and_then(PropertyRef::as_property)
  }

  /// Enum members rendered as plain strings; non-string members use their JSON spelling.
  pub fn enum_labels(&self) -> Vec<String> {
    self
      .enum_values
      .iter()
      .map(|value| match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
      })
      .collect()
  }

  pub(crate) fn collect_refs(&self, refs: &mut IndexSet<String>) {
    refs.extend(self.related.iter().cloned());
    if let Some(reference) = &self.reference {
      reference.collect_refs(refs);
    }
  }
}
