//! Python source emitters for the extracted object model.

use std::{
  collections::{BTreeMap, BTreeSet},
  fmt::Write as _,
};

use clap::ValueEnum;
use itertools::Itertools;
use openapi_reader_core::OpenApiDefinition;
use serde_json::Value;
use strum::Display;

use crate::naming::python_string;

pub mod drf;
pub mod fastapi;

#[cfg(test)]
mod tests;

pub use drf::DrfEmitter;
pub use fastapi::FastApiEmitter;

pub(crate) const INDENT: &str = "    ";

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Framework {
  /// Django REST Framework serializers and function views
  #[default]
  Drf,
  /// Pydantic models and an APIRouter
  Fastapi,
}

impl Framework {
  pub fn emitter(self) -> &'static dyn Emitter {
    match self {
      Self::Drf => &DrfEmitter,
      Self::Fastapi => &FastApiEmitter,
    }
  }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Concurrency {
  /// Plain `def` handlers
  Sync,
  /// `async def` handlers
  #[default]
  Async,
}

impl Concurrency {
  pub const fn def_keyword(self) -> &'static str {
    match self {
      Self::Sync => "def",
      Self::Async => "async def",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
  pub concurrency: Concurrency,
  /// Shown in the header comment of every generated file.
  pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  pub name: &'static str,
  pub content: String,
}

pub trait Emitter {
  fn framework(&self) -> Framework;

  fn emit(&self, definition: &OpenApiDefinition, options: &EmitOptions) -> anyhow::Result<Vec<GeneratedFile>>;
}

/// `from ... import ...` statements collected while a file is rendered.
///
/// Modules and the names imported from them are kept sorted and deduplicated, so the rendered block
/// does not depend on the order in which the render calls asked for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
  names: BTreeMap<String, BTreeSet<String>>,
}

impl ImportSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Records `from <module> import <name>`.
  pub fn name(&mut self, module: &str, name: &str) {
    self
      .names
      .entry(module.to_string())
      .or_default()
      .insert(name.to_string());
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }

  /// Absolute imports come first, relative (`.`) imports last.
  pub fn render(&self) -> String {
    let (relative, absolute): (Vec<_>, Vec<_>) = self.names.iter().partition(|(module, _)| module.starts_with('.'));
    absolute
      .into_iter()
      .chain(relative)
      .map(|(module, names)| format!("from {module} import {}", names.iter().join(", ")))
      .join("\n")
  }
}

/// Header comment, import block and body, separated the way the Python formatters lay them out.
pub(crate) fn assemble(source: &str, imports: &ImportSet, body: &str) -> String {
  let mut out = format!("# Generated by openapi-reader from {source}. Do not edit by hand.\n");
  if !imports.is_empty() {
    let _ = writeln!(out, "\n{}", imports.render());
  }
  let body = body.trim_matches('\n');
  if !body.is_empty() {
    let _ = writeln!(out, "\n\n{body}");
  }
  out
}

/// A JSON value spelled as a Python literal.
pub(crate) fn python_literal(value: &Value) -> String {
  match value {
    Value::Null => "None".to_string(),
    Value::Bool(true) => "True".to_string(),
    Value::Bool(false) => "False".to_string(),
    Value::Number(number) => number.to_string(),
    Value::String(text) => python_string(text),
    Value::Array(items) => format!("[{}]", items.iter().map(python_literal).join(", ")),
    Value::Object(entries) => format!(
      "{{{}}}",
      entries
        .iter()
        .map(|(key, value)| format!("{}: {}", python_string(key), python_literal(value)))
        .join(", ")
    ),
  }
}

/// A triple-quoted docstring at the given indentation, or nothing for blank text.
pub(crate) fn docstring(text: Option<&str>, indent: &str) -> Option<String> {
  let text = text.map(str::trim).filter(|text| !text.is_empty())?;
  let text = text.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"");
  Some(format!("{indent}\"\"\"{text}\"\"\""))
}
