use crate::definition::ExtractionStage;

pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Conditions that stop an extraction pass.
///
/// Per-property anomalies never end up here; they are collected as
/// [`Diagnostic`](crate::Diagnostic) values next to the model instead.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
  #[error("malformed document: `{key}` {reason}")]
  MalformedDocument { key: String, reason: String },

  #[error("cyclic schema reference: {}", cycle.join(" -> "))]
  CyclicSchemaReference { cycle: Vec<String> },

  #[error("unresolvable reference `{reference}` at {context}")]
  UnresolvableReference { reference: String, context: String },

  #[error("unsupported reference `{reference}` at {context}: only local `#/components/...` references are followed")]
  UnsupportedReference { reference: String, context: String },

  #[error("cannot run {requested} while the definition is {stage}")]
  OutOfOrder {
    requested: &'static str,
    stage: ExtractionStage,
  },

  #[error("invalid JSON document: {0}")]
  Json(#[from] serde_json::Error),

  #[error("invalid YAML document: {0}")]
  Yaml(#[from] serde_yaml::Error),
}

impl ExtractionError {
  pub(crate) fn missing(key: impl Into<String>) -> Self {
    Self::MalformedDocument {
      key: key.into(),
      reason: "is missing".to_string(),
    }
  }

  pub(crate) fn not_a_mapping(key: impl Into<String>) -> Self {
    Self::MalformedDocument {
      key: key.into(),
      reason: "is not a mapping".to_string(),
    }
  }

  /// Whether the error was raised by the structure of the document rather than by misuse of the API.
  pub fn is_document_error(&self) -> bool {
    !matches!(self, Self::OutOfOrder { .. })
  }
}
