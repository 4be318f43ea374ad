//! Dependency ordering over built schemas.

use std::{collections::BTreeSet, sync::Arc};

use indexmap::{IndexMap, IndexSet};
use petgraph::{
  Direction::{Incoming, Outgoing},
  algo::kosaraju_scc,
  graphmap::DiGraphMap,
  visit::Dfs,
};

use crate::{
  error::{ExtractionError, Result},
  model::Schema,
};

/// Edges run from a dependency to the schemas that reference it, keyed by declaration index.
fn dependency_graph(schemas: &IndexMap<String, Arc<Schema>>) -> DiGraphMap<usize, ()> {
  let mut graph = DiGraphMap::new();
  for index in 0..schemas.len() {
    graph.add_node(index);
  }

  for (index, schema) in schemas.values().enumerate() {
    for dependency in schema.refs() {
      if let Some(dependency_index) = schemas.get_index_of(&dependency) {
        graph.add_edge(dependency_index, index, ());
      }
    }
  }
  graph
}

/// Orders schemas so every schema comes after all the schemas it references.
///
/// Kahn's algorithm over the reference graph; among the schemas that are ready at any point the one
/// declared first is emitted first, so documents without forward references keep their order.
pub fn topo_order(schemas: &IndexMap<String, Arc<Schema>>) -> Result<Vec<(&String, &Arc<Schema>)>> {
  let graph = dependency_graph(schemas);

  let mut pending: Vec<usize> = (0..schemas.len())
    .map(|index| graph.neighbors_directed(index, Incoming).count())
    .collect();
  let mut ready: BTreeSet<usize> = pending
    .iter()
    .enumerate()
    .filter_map(|(index, count)| (*count == 0).then_some(index))
    .collect();

  let mut order = Vec::with_capacity(schemas.len());
  while let Some(index) = ready.pop_first() {
    order.push(index);
    for dependent in graph.neighbors_directed(index, Outgoing) {
      pending[dependent] -= 1;
      if pending[dependent] == 0 {
        ready.insert(dependent);
      }
    }
  }

  if order.len() < schemas.len() {
    return Err(ExtractionError::CyclicSchemaReference {
      cycle: first_cycle(&graph, schemas),
    });
  }

  Ok(order.into_iter().filter_map(|index| schemas.get_index(index)).collect())
}

fn first_cycle(graph: &DiGraphMap<usize, ()>, schemas: &IndexMap<String, Arc<Schema>>) -> Vec<String> {
  let Some(mut component) = kosaraju_scc(graph)
    .into_iter()
    .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
    .min_by_key(|scc| scc.iter().min().copied())
  else {
    return vec![];
  };

  component.sort_unstable();
  let mut cycle: Vec<String> = component
    .iter()
    .filter_map(|index| schemas.get_index(*index).map(|(name, _)| name.clone()))
    .collect();
  if let Some(first) = cycle.first().cloned() {
    cycle.push(first);
  }
  cycle
}

/// The given schema names plus every schema they reference, directly or transitively.
pub fn reachable(schemas: &IndexMap<String, Arc<Schema>>, initial: &IndexSet<String>) -> IndexSet<String> {
  let graph = DiGraphMap::<&str, ()>::from_edges(schemas.iter().flat_map(|(name, schema)| {
    schema
      .refs()
      .into_iter()
      .filter_map(|dependency| schemas.get_key_value(&dependency).map(|(key, _)| key.as_str()))
      .map(move |dependency| (name.as_str(), dependency))
      .collect::<Vec<_>>()
  }));

  let mut expanded = initial.clone();
  for start in initial {
    if graph.contains_node(start.as_str()) {
      let mut dfs = Dfs::new(&graph, start.as_str());
      while let Some(node) = dfs.next(&graph) {
        expanded.insert(node.to_string());
      }
    }
  }
  expanded
}
