use strum::{Display, EnumString, IntoStaticStr};

/// The value type a [`Property`](super::Property) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SemanticType {
  String,
  Integer,
  Float,
  Boolean,
  Date,
  DateTime,
  Enum,
  Array,
  ObjectReference,
}

impl SemanticType {
  pub const fn is_scalar(self) -> bool {
    matches!(
      self,
      Self::String | Self::Integer | Self::Float | Self::Boolean | Self::Date | Self::DateTime
    )
  }

  pub const fn is_temporal(self) -> bool {
    matches!(self, Self::Date | Self::DateTime)
  }
}

/// The top-level kind of a [`Schema`](super::Schema) declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaKind {
  #[default]
  Object,
  Array,
  String,
  Integer,
  Number,
  Boolean,
}

impl SchemaKind {
  /// Anything that is not a recognised primitive counts as an object, including an absent `type`.
  pub fn from_declared(declared: Option<&str>) -> Self {
    declared.and_then(|name| name.parse().ok()).unwrap_or_default()
  }
}
