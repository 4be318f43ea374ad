use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use crate::{
  config::ExtractionConfig, diagnostics::Diagnostic, error::Result, model::Schema, resolver::SchemaResolver,
  schema_graph,
};

/// Every component schema of a document, built once and keyed by name in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
  schemas: IndexMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
  /// Builds all of `components.schemas`, resolving cross-references as it goes.
  pub fn extract(document: &Value, config: ExtractionConfig) -> Result<(Self, Vec<Diagnostic>)> {
    let mut resolver = SchemaResolver::new(document, config)?;
    let names: Vec<&String> = resolver.declared_names().collect();
    for name in &names {
      resolver.resolve_schema(name)?;
    }

    let (built, diagnostics) = resolver.into_parts();
    let schemas = names
      .into_iter()
      .filter_map(|name| built.get(name).map(|schema| (name.clone(), Arc::clone(schema))))
      .collect();

    Ok((Self { schemas }, diagnostics))
  }

  pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
    self.schemas.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.schemas.contains_key(name)
  }

  pub fn schemas(&self) -> &IndexMap<String, Arc<Schema>> {
    &self.schemas
  }

  pub fn names(&self) -> impl Iterator<Item = &String> {
    self.schemas.keys()
  }

  pub fn len(&self) -> usize {
    self.schemas.len()
  }

  pub fn is_empty(&self) -> bool {
    self.schemas.is_empty()
  }

  /// Schemas in an order where each one follows everything it references.
  pub fn emission_order(&self) -> Result<Vec<(&String, &Arc<Schema>)>> {
    schema_graph::topo_order(&self.schemas)
  }

  pub fn reachable(&self, initial: &IndexSet<String>) -> IndexSet<String> {
    schema_graph::reachable(&self.schemas, initial)
  }
}
