use std::path::PathBuf;

use anyhow::Context;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use itertools::Itertools;
use openapi_reader_core::{OpenApiDefinition, config::ExtractionConfig};

use crate::{
  loader::DocumentLoader,
  ui::{Colors, colors::table_color, term_width},
};

async fn load_definition(input: &PathBuf) -> anyhow::Result<OpenApiDefinition> {
  let loader = DocumentLoader::open(input).await?;
  let document = loader.parse()?;
  OpenApiDefinition::from_document(document, ExtractionConfig::default())
    .with_context(|| format!("failed to read {}", input.display()))
}

fn new_table(colors: &Colors, headers: &[&str]) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in headers {
    row.add_cell(Cell::new(header).fg(table_color(colors.label())));
  }
  table.set_header(row);
  table
}

fn operations_table(definition: &OpenApiDefinition, colors: &Colors) -> Table {
  let operations = definition
    .paths()
    .iter()
    .flat_map(|path| path.methods.iter().map(move |method| (path, method)))
    .sorted_by(|(_, a), (_, b)| a.operation_id.cmp(&b.operation_id));

  let mut table = new_table(colors, &["OPERATION ID", "METHOD", "PATH", "TAGS"]);
  for (path, method) in operations {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(&method.operation_id)
        .fg(table_color(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(method.verb.as_method().as_str())
        .fg(table_color(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(&path.path).fg(table_color(colors.primary())));
    row.add_cell(Cell::new(method.tags.join(", ")).fg(table_color(colors.info())));
    table.add_row(row);
  }
  table
}

fn schemas_table(definition: &OpenApiDefinition, colors: &Colors) -> Table {
  let usage = definition.operation_refs();

  let mut table = new_table(colors, &["SCHEMA", "PROPERTIES", "USED BY"]);
  for (name, schema) in definition.created_schemas() {
    let used_by = usage.get(name).map(|operations| operations.join(", ")).unwrap_or_default();

    let mut row = Row::new();
    row.add_cell(
      Cell::new(name)
        .fg(table_color(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(schema.properties.len())
        .fg(table_color(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(used_by).fg(table_color(colors.primary())));
    table.add_row(row);
  }
  table
}

pub async fn list_operations(input: &PathBuf, colors: &Colors) -> anyhow::Result<()> {
  let definition = load_definition(input).await?;
  println!("{}", operations_table(&definition, colors));
  Ok(())
}

pub async fn list_schemas(input: &PathBuf, colors: &Colors) -> anyhow::Result<()> {
  let definition = load_definition(input).await?;
  println!("{}", schemas_table(&definition, colors));
  Ok(())
}
