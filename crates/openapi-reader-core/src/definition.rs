use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use strum::Display;

use crate::{
  config::ExtractionConfig,
  diagnostics::Diagnostic,
  document,
  error::{ExtractionError, Result},
  model::{ApiPath, Schema},
  paths,
  registry::SchemaRegistry,
  resolver::SchemaResolver,
};

/// Where an [`OpenApiDefinition`] is in its two-pass lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ExtractionStage {
  Pending,
  SchemasExtracted,
  Complete,
  Failed,
}

/// Counts reported after a successful extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
  pub schemas: usize,
  pub paths: usize,
  pub methods: usize,
  pub parameters: usize,
  pub diagnostics: usize,
  pub degraded: usize,
}

/// Owns a parsed document until both extraction passes have run, then only the model.
///
/// Schemas must be extracted before paths, and each pass runs once. Any other sequence is rejected
/// with [`ExtractionError::OutOfOrder`]. A failed pass leaves the definition empty and in the
/// [`ExtractionStage::Failed`] stage.
#[derive(Debug)]
pub struct OpenApiDefinition {
  document: Option<Value>,
  config: ExtractionConfig,
  stage: ExtractionStage,
  registry: SchemaRegistry,
  paths: Vec<ApiPath>,
  diagnostics: Vec<Diagnostic>,
}

impl OpenApiDefinition {
  pub fn new(document: Value) -> Self {
    Self::with_config(document, ExtractionConfig::default())
  }

  pub fn with_config(document: Value, config: ExtractionConfig) -> Self {
    Self {
      document: Some(document),
      config,
      stage: ExtractionStage::Pending,
      registry: SchemaRegistry::default(),
      paths: vec![],
      diagnostics: vec![],
    }
  }

  /// Runs both passes.
  pub fn from_document(document: Value, config: ExtractionConfig) -> Result<Self> {
    let mut definition = Self::with_config(document, config);
    definition.extract_schemas()?;
    definition.extract_paths()?;
    Ok(definition)
  }

  /// First pass: builds every schema under `components.schemas`.
  pub fn extract_schemas(&mut self) -> Result<()> {
    self.expect_stage(ExtractionStage::Pending, "extract_schemas")?;
    let Some(document) = self.document.as_ref() else {
      return Err(self.out_of_order("extract_schemas"));
    };

    let outcome = document::validate(document).and_then(|()| SchemaRegistry::extract(document, self.config));
    match outcome {
      Ok((registry, diagnostics)) => {
        self.registry = registry;
        self.diagnostics = diagnostics;
        self.stage = ExtractionStage::SchemasExtracted;
        Ok(())
      }
      Err(error) => Err(self.fail(error)),
    }
  }

  /// Second pass: binds every operation under `paths` to the schemas of the first pass.
  pub fn extract_paths(&mut self) -> Result<()> {
    self.expect_stage(ExtractionStage::SchemasExtracted, "extract_paths")?;
    let Some(document) = self.document.as_ref() else {
      return Err(self.out_of_order("extract_paths"));
    };

    let outcome = document::paths(document).and_then(|raw_paths| {
      let mut resolver = SchemaResolver::new(document, self.config)?.with_known(self.registry.schemas().clone());
      let paths = paths::extract_paths(raw_paths, &mut resolver)?;
      let (_, diagnostics) = resolver.into_parts();
      Ok((paths, diagnostics))
    });

    match outcome {
      Ok((paths, diagnostics)) => {
        self.paths = paths;
        self.diagnostics.extend(diagnostics);
        self.stage = ExtractionStage::Complete;
        self.document = None;
        Ok(())
      }
      Err(error) => Err(self.fail(error)),
    }
  }

  fn expect_stage(&self, expected: ExtractionStage, requested: &'static str) -> Result<()> {
    if self.stage == expected {
      Ok(())
    } else {
      Err(self.out_of_order(requested))
    }
  }

  fn out_of_order(&self, requested: &'static str) -> ExtractionError {
    ExtractionError::OutOfOrder {
      requested,
      stage: self.stage,
    }
  }

  fn fail(&mut self, error: ExtractionError) -> ExtractionError {
    self.document = None;
    self.registry = SchemaRegistry::default();
    self.paths.clear();
    self.diagnostics.clear();
    self.stage = ExtractionStage::Failed;
    error
  }

  pub fn stage(&self) -> ExtractionStage {
    self.stage
  }

  pub fn config(&self) -> ExtractionConfig {
    self.config
  }

  pub fn created_schemas(&self) -> &IndexMap<String, Arc<Schema>> {
    self.registry.schemas()
  }

  pub fn registry(&self) -> &SchemaRegistry {
    &self.registry
  }

  pub fn paths(&self) -> &[ApiPath] {
    &self.paths
  }

  pub fn diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }

  /// Schemas in dependency order, available once the schema pass has run.
  pub fn emission_order(&self) -> Result<Vec<(&String, &Arc<Schema>)>> {
    match self.stage {
      ExtractionStage::SchemasExtracted | ExtractionStage::Complete => self.registry.emission_order(),
      ExtractionStage::Pending | ExtractionStage::Failed => Err(self.out_of_order("emission_order")),
    }
  }

  pub fn stats(&self) -> ExtractionStats {
    let methods = self.paths.iter().flat_map(|path| &path.methods);
    ExtractionStats {
      schemas: self.registry.len(),
      paths: self.paths.len(),
      methods: methods.clone().count(),
      parameters: methods.map(|method| method.params.len()).sum(),
      diagnostics: self.diagnostics.len(),
      degraded: self.diagnostics.iter().filter(|diagnostic| diagnostic.is_degraded()).count(),
    }
  }

  /// For each schema, the ids of the operations that use it directly or through other schemas.
  ///
  /// Schemas appear in declaration order; schemas no operation reaches are left out.
  pub fn operation_refs(&self) -> IndexMap<String, Vec<String>> {
    let mut usage: IndexMap<String, Vec<String>> = self
      .registry
      .names()
      .map(|name| (name.clone(), vec![]))
      .collect();

    for method in self.paths.iter().flat_map(|path| &path.methods) {
      for name in self.registry.reachable(&method.schema_refs()) {
        if let Some(operations) = usage.get_mut(&name) {
          operations.push(method.operation_id.clone());
        }
      }
    }

    usage.retain(|_, operations| !operations.is_empty());
    usage
  }
}
