use std::sync::Arc;

use http::StatusCode;
use indexmap::{IndexMap, IndexSet};
use oas3::spec::ParameterIn;
use strum::{Display, EnumString};

use super::{Property, ResponseSchema, Schema};
use crate::status::{self, FAILURE_RANGE, SUCCESS_RANGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum HttpVerb {
  Get,
  Post,
  Put,
  Patch,
  Delete,
}

impl HttpVerb {
  pub fn as_method(self) -> http::Method {
    match self {
      Self::Get => http::Method::GET,
      Self::Post => http::Method::POST,
      Self::Put => http::Method::PUT,
      Self::Patch => http::Method::PATCH,
      Self::Delete => http::Method::DELETE,
    }
  }

  /// Whether the verb conventionally carries a request body.
  pub const fn has_body(self) -> bool {
    matches!(self, Self::Post | Self::Put | Self::Patch)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParamLocation {
  #[default]
  Query,
  Path,
  Header,
  Cookie,
}

impl From<ParameterIn> for ParamLocation {
  fn from(value: ParameterIn) -> Self {
    match value {
      ParameterIn::Path => Self::Path,
      ParameterIn::Query => Self::Query,
      ParameterIn::Header => Self::Header,
      ParameterIn::Cookie => Self::Cookie,
    }
  }
}

/// A query, path, header or cookie parameter.
///
/// The parameter's own type is described by a one-property anonymous schema, so parameters share
/// the property machinery with request and response bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
  pub description: String,
  pub explode: bool,
  pub location: ParamLocation,
  pub name: String,
  pub required: bool,
  pub schema: Arc<Schema>,
}

impl QueryParam {
  pub fn property(&self) -> Option<&Property> {
    self.schema.properties.first()
  }
}

/// One HTTP verb declared on an [`ApiPath`](super::ApiPath).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
  pub operation_id: String,
  pub verb: HttpVerb,
  pub request_schema: Arc<Schema>,
  pub request_schema_required: bool,
  /// Declared response keys in document order; `None` marks a status without a JSON body.
  pub responses: IndexMap<String, Option<ResponseSchema>>,
  pub tags: Vec<String>,
  pub params: Vec<QueryParam>,
  pub summary: Option<String>,
  /// What the `default` response key counts as.
  pub default_status: StatusCode,
}

impl Method {
  fn classified(&self) -> impl Iterator<Item = (StatusCode, Option<&ResponseSchema>)> {
    self
      .responses
      .iter()
      .filter_map(|(key, response)| Some((status::classify(key, self.default_status)?, response.as_ref())))
  }

  /// The body of the first response in the 200..=226 range.
  ///
  /// `None` when there is no such response or when it declares no JSON body.
  pub fn success_response(&self) -> Option<&ResponseSchema> {
    self
      .classified()
      .find(|(code, _)| SUCCESS_RANGE.contains(&code.as_u16()))
      .and_then(|(_, response)| response)
  }

  pub fn success_status(&self) -> StatusCode {
    self
      .classified()
      .map(|(code, _)| code)
      .find(|code| SUCCESS_RANGE.contains(&code.as_u16()))
      .unwrap_or(StatusCode::OK)
  }

  pub fn failure_status(&self) -> StatusCode {
    self
      .classified()
      .map(|(code, _)| code)
      .find(|code| FAILURE_RANGE.contains(&code.as_u16()))
      .unwrap_or(StatusCode::BAD_REQUEST)
  }

  pub fn has_request_body(&self) -> bool {
    !self.request_schema.is_empty()
  }

  pub fn params_in(&self, location: ParamLocation) -> impl Iterator<Item = &QueryParam> {
    self.params.iter().filter(move |param| param.location == location)
  }

  /// Schema names reachable from the request body, responses and parameters, in first-seen order.
  pub fn schema_refs(&self) -> IndexSet<String> {
    let mut refs = IndexSet::new();
    let mut visit = |schema: &Schema| {
      if !schema.is_anonymous() {
        refs.insert(schema.name.clone());
      }
      schema.collect_refs(&mut refs);
    };

    visit(&self.request_schema);
    for response in self.responses.values().flatten() {
      visit(&response.schema);
    }
    for param in &self.params {
      visit(&param.schema);
    }
    refs
  }
}
