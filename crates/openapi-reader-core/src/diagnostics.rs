use strum::Display;

/// A non-fatal anomaly observed while extracting the model.
///
/// Every diagnostic names the place in the document it refers to, e.g. `Order.status` or
/// `GET /pets responses.200`.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Diagnostic {
  #[strum(to_string = "{location}: unknown type '{declared}' (format '{format}'), left untyped")]
  UnknownPrimitiveType {
    location: String,
    declared: String,
    format: String,
  },
  #[strum(to_string = "{location}: reference '{reference}' could not be resolved and was dropped")]
  UnresolvedReference { location: String, reference: String },
  #[strum(to_string = "{location}: no application/json content (found {media_types}), body ignored")]
  UnsupportedMediaType { location: String, media_types: String },
  #[strum(to_string = "{verb} {path}: operation skipped, verb is not supported")]
  UnsupportedOperation { path: String, verb: String },
  #[strum(to_string = "{location}: array declares no items, item type left untyped")]
  MissingArrayItems { location: String },
  #[strum(to_string = "{location}: '{keyword}' is not modelled, only the schemas it references are kept")]
  UnsupportedComposition { location: String, keyword: String },
}

impl Diagnostic {
  /// Whether part of the document was dropped or replaced with a placeholder.
  pub fn is_degraded(&self) -> bool {
    matches!(
      self,
      Self::UnresolvedReference { .. }
        | Self::UnsupportedMediaType { .. }
        | Self::UnsupportedOperation { .. }
        | Self::UnsupportedComposition { .. }
    )
  }

  pub fn location(&self) -> String {
    match self {
      Self::UnknownPrimitiveType { location, .. }
      | Self::UnresolvedReference { location, .. }
      | Self::UnsupportedMediaType { location, .. }
      | Self::MissingArrayItems { location }
      | Self::UnsupportedComposition { location, .. } => location.clone(),
      Self::UnsupportedOperation { path, verb } => format!("{verb} {path}"),
    }
  }
}
