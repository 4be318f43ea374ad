use std::sync::Arc;

use strum::Display;

use super::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ResponseKind {
  Object,
  ArrayOfObject,
  ArrayOfScalar,
}

impl ResponseKind {
  pub const fn is_array(self) -> bool {
    matches!(self, Self::ArrayOfObject | Self::ArrayOfScalar)
  }
}

/// The body bound to one status code of one operation.
///
/// For [`ResponseKind::ArrayOfScalar`] the schema is an anonymous wrapper whose single property
/// describes the item type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSchema {
  /// `false` when the body schema is declared nullable.
  pub required: bool,
  pub kind: ResponseKind,
  pub schema: Arc<Schema>,
  pub description: Option<String>,
}

impl ResponseSchema {
  pub fn is_array(&self) -> bool {
    self.kind.is_array()
  }
}
