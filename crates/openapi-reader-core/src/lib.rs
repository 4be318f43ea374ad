//! Reads an OpenAPI 3.x document into an in-memory object model.
//!
//! The model is built in two passes over the raw document: component schemas first, then the
//! `paths` section, which binds every operation to the schemas the first pass produced.
//!
//! ```no_run
//! use openapi_reader_core::{OpenApiDefinition, config::ExtractionConfig, document};
//!
//! # fn example() -> openapi_reader_core::Result<()> {
//! let raw = std::fs::read_to_string("openapi.yaml").unwrap_or_default();
//! let value = document::parse_str(&raw, document::DocumentFormat::Yaml)?;
//! let definition = OpenApiDefinition::from_document(value, ExtractionConfig::default())?;
//!
//! for (name, _) in definition.emission_order()? {
//!   println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod definition;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod model;
pub mod paths;
pub mod properties;
pub mod refs;
pub mod registry;
pub mod resolver;
pub mod schema_graph;
pub mod status;
pub mod type_mapper;

#[cfg(test)]
mod tests;

pub use definition::{ExtractionStage, ExtractionStats, OpenApiDefinition};
pub use diagnostics::Diagnostic;
pub use error::{ExtractionError, Result};
pub use model::{
  ApiPath, HttpVerb, Method, ParamLocation, Property, PropertyRef, QueryParam, ResponseKind, ResponseSchema, Schema,
  SchemaKind, SemanticType,
};
