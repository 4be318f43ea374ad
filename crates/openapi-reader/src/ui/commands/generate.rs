use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use http::StatusCode;
use itertools::Itertools;
use openapi_reader_core::{
  Diagnostic, OpenApiDefinition,
  config::{ExtractionConfig, ReferencePolicy},
  document::DocumentFormat,
};

use crate::{
  codegen::{Concurrency, EmitOptions, Framework, GeneratedFile},
  loader::DocumentLoader,
  ui::{Colors, GenerateCommand},
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub output: PathBuf,
  pub framework: Framework,
  pub concurrency: Concurrency,
  pub extraction: ExtractionConfig,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      output,
      framework,
      concurrency,
      lenient_refs,
      default_status,
      verbose,
      quiet,
    } = command;

    let default_status =
      StatusCode::from_u16(default_status).with_context(|| format!("invalid --default-status {default_status}"))?;
    let output = match output {
      Some(path) => path,
      None => tempfile::Builder::new()
        .prefix("openapi-reader-")
        .tempdir()
        .context("failed to create a temporary output directory")?
        .keep(),
    };
    let reference_policy = if lenient_refs {
      ReferencePolicy::Lenient
    } else {
      ReferencePolicy::Strict
    };

    Ok(Self {
      input,
      output,
      framework,
      concurrency,
      extraction: ExtractionConfig::builder()
        .reference_policy(reference_policy)
        .default_status(default_status)
        .build(),
      verbose,
      quiet,
    })
  }

  fn emit_options(&self) -> EmitOptions {
    EmitOptions {
      concurrency: self.concurrency,
      source: self.input.display().to_string(),
    }
  }

  async fn write_files(&self, files: &[GeneratedFile]) -> anyhow::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(&self.output)
      .await
      .with_context(|| format!("failed to create {}", self.output.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
      let path = self.output.join(file.name);
      tokio::fs::write(&path, &file.content)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
      written.push(path);
    }
    Ok(written)
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        message.with(self.colors.primary())
      );
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self, format: DocumentFormat) {
    let format = match format {
      DocumentFormat::Json => "JSON",
      DocumentFormat::Yaml => "YAML",
    };
    self.info(&format!(
      "Loading OpenAPI {format} document from: {}",
      self.config.input.display()
    ));
  }

  fn log_extracting(&self) {
    self.info("Extracting schemas and operations...");
  }

  fn print_statistics(&self, definition: &OpenApiDefinition) -> anyhow::Result<()> {
    if self.config.quiet {
      return Ok(());
    }

    let stats = definition.stats();
    self.stat("Schemas extracted:", stats.schemas.to_string());
    self.stat("Paths extracted:", stats.paths.to_string());
    self.stat("", format!("{} operations", stats.methods));
    self.stat("", format!("{} parameters", stats.parameters));
    if stats.diagnostics > 0 {
      self.stat(
        "Diagnostics:",
        format!("{} ({} degraded)", stats.diagnostics, stats.degraded),
      );
    }

    if self.config.verbose {
      let order = definition.emission_order()?;
      println!(
        "              {}: {}",
        "Emission order".with(self.colors.accent()),
        order.iter().map(|(name, _)| name).join(", ").with(self.colors.info())
      );
    }

    self.print_diagnostics(definition.diagnostics());
    Ok(())
  }

  /// Dropped parts of the document are always reported; other diagnostics only when verbose.
  fn print_diagnostics(&self, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() || self.config.quiet {
      return;
    }

    let mut printed_header = false;
    for diagnostic in diagnostics {
      if !diagnostic.is_degraded() && !self.config.verbose {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      let label = if diagnostic.is_degraded() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        diagnostic.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_generating(&self, framework: Framework) {
    let message = match (framework, self.config.concurrency) {
      (Framework::Drf, _) => "Generating Django REST Framework sources...".to_string(),
      (Framework::Fastapi, concurrency) => format!("Generating FastAPI sources ({concurrency} handlers)..."),
    };
    self.info(&message);
  }

  fn log_writing(&self) {
    self.info(&format!("Writing to: {}", self.config.output.display()));
  }

  fn log_written(&self, written: &[PathBuf]) {
    if self.config.verbose {
      for path in written {
        self.stat("", path.display().to_string());
      }
    }
  }

  fn log_success(&self, file_count: usize) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        format!("Successfully generated {file_count} files").with(self.colors.success())
      );
    }
  }
}

/// Loads, extracts and renders one document; returns the paths of the files written.
pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<Vec<PathBuf>> {
  let logger = GenerateLogger::new(&config, colors);

  let loader = DocumentLoader::open(&config.input).await?;
  logger.log_loading(loader.format());
  let document = loader.parse()?;

  logger.log_extracting();
  let definition = OpenApiDefinition::from_document(document, config.extraction)
    .with_context(|| format!("failed to read {}", config.input.display()))?;
  logger.print_statistics(&definition)?;

  let emitter = config.framework.emitter();
  logger.log_generating(emitter.framework());
  let files = emitter.emit(&definition, &config.emit_options())?;

  logger.log_writing();
  let written = config.write_files(&files).await?;
  logger.log_written(&written);

  logger.log_success(written.len());
  Ok(written)
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::*;
  use crate::ui::colors::Theme;

  fn command(input: &str, output: Option<&Path>) -> GenerateCommand {
    GenerateCommand {
      input: PathBuf::from(input),
      output: output.map(Path::to_path_buf),
      framework: Framework::Drf,
      concurrency: Concurrency::Async,
      lenient_refs: false,
      default_status: 200,
      verbose: false,
      quiet: true,
    }
  }

  fn petstore_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../openapi-reader-core/fixtures/petstore.yaml")
  }

  #[test]
  fn test_from_command_keeps_explicit_output() {
    let config = GenerateConfig::from_command(command("api.yaml", Some(Path::new("out")))).unwrap();
    assert_eq!(config.output, PathBuf::from("out"));
    assert_eq!(config.extraction, ExtractionConfig::default());
    assert_eq!(config.framework, Framework::Drf);
  }

  #[test]
  fn test_from_command_creates_temporary_output() {
    let config = GenerateConfig::from_command(command("api.yaml", None)).unwrap();
    assert!(config.output.is_dir(), "{}", config.output.display());
    assert!(
      config
        .output
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with("openapi-reader-"))
    );
    std::fs::remove_dir_all(&config.output).unwrap();
  }

  #[test]
  fn test_from_command_maps_extraction_flags() {
    let mut generate = command("api.yaml", Some(Path::new("out")));
    generate.lenient_refs = true;
    generate.default_status = 201;

    let config = GenerateConfig::from_command(generate).unwrap();
    assert_eq!(config.extraction.reference_policy, ReferencePolicy::Lenient);
    assert_eq!(config.extraction.default_status, StatusCode::CREATED);
  }

  #[test]
  fn test_from_command_rejects_invalid_default_status() {
    let mut generate = command("api.yaml", Some(Path::new("out")));
    generate.default_status = 42;

    let err = GenerateConfig::from_command(generate).unwrap_err();
    assert!(err.to_string().contains("invalid --default-status 42"), "{err}");
  }

  #[tokio::test]
  async fn test_generate_drf_into_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut generate = command("", Some(dir.path()));
    generate.input = petstore_path();
    let config = GenerateConfig::from_command(generate).unwrap();

    let written = generate_code(config, &Colors::new(false, Theme::Dark)).await.unwrap();
    assert_eq!(
      written,
      vec![dir.path().join("serializers.py"), dir.path().join("views.py")]
    );
    let views = std::fs::read_to_string(dir.path().join("views.py")).unwrap();
    assert!(views.contains("@api_view([\"PUT\", \"POST\"])"), "{views}");
  }

  #[tokio::test]
  async fn test_generate_fastapi_into_nested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("app").join("api");
    let mut generate = command("", Some(&output));
    generate.input = petstore_path();
    generate.framework = Framework::Fastapi;
    generate.concurrency = Concurrency::Sync;
    let config = GenerateConfig::from_command(generate).unwrap();

    let written = generate_code(config, &Colors::new(false, Theme::Dark)).await.unwrap();
    assert_eq!(written, vec![output.join("models.py"), output.join("routes.py")]);
    let routes = std::fs::read_to_string(output.join("routes.py")).unwrap();
    assert!(routes.contains("def update_pet(body: Pet):"), "{routes}");
    assert!(!routes.contains("async def"), "{routes}");
  }

  #[tokio::test]
  async fn test_generate_reports_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.yaml");
    let mut generate = command("", Some(dir.path()));
    generate.input.clone_from(&missing);
    let config = GenerateConfig::from_command(generate).unwrap();

    let err = generate_code(config, &Colors::new(false, Theme::Dark)).await.unwrap_err();
    assert!(err.to_string().contains("missing.yaml"), "{err}");
  }
}
