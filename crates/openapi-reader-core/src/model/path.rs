use indexmap::IndexSet;

use super::{HttpVerb, Method, ParamLocation};

/// A URL template and the verbs declared on it, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
  pub path: String,
  pub methods: Vec<Method>,
}

impl ApiPath {
  pub fn method(&self, verb: HttpVerb) -> Option<&Method> {
    self.methods.iter().find(|method| method.verb == verb)
  }

  pub fn verbs(&self) -> Vec<HttpVerb> {
    self.methods.iter().map(|method| method.verb).collect()
  }

  /// Path parameter names across all verbs, deduplicated.
  pub fn path_params(&self) -> IndexSet<&str> {
    self
      .methods
      .iter()
      .flat_map(|method| method.params_in(ParamLocation::Path))
      .map(|param| param.name.as_str())
      .collect()
  }
}
