use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};
use crate::codegen::{Concurrency, Framework};

#[derive(Parser, Debug)]
#[command(name = "openapi-reader")]
#[command(author, version, about = "Reads OpenAPI 3.x documents and generates Django REST Framework or FastAPI sources")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate Python sources from an OpenAPI document
  Generate(GenerateCommand),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  /// Path to the OpenAPI YAML or JSON document
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Directory the generated files are written to (defaults to a new temporary directory)
  #[arg(short, long, value_name = "DIR")]
  pub output: Option<PathBuf>,

  /// Web framework to generate sources for
  #[arg(short, long, value_enum, default_value_t = Framework::Drf)]
  pub framework: Framework,

  /// Handler style for frameworks that support both (FastAPI)
  #[arg(long, value_enum, default_value_t = Concurrency::Async)]
  pub concurrency: Concurrency,

  /// Drop unresolvable `$ref`s with a warning instead of failing
  #[arg(long, default_value_t = false)]
  pub lenient_refs: bool,

  /// Status code the `default` response key counts as
  #[arg(long, value_name = "CODE", default_value_t = 200)]
  pub default_status: u16,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List all operations defined in the OpenAPI document
  Operations {
    /// Path to the OpenAPI YAML or JSON document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
  /// List all component schemas and the operations that use them
  Schemas {
    /// Path to the OpenAPI YAML or JSON document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}

#[cfg(test)]
mod tests {
  use clap::{CommandFactory, Parser};

  use super::*;

  #[test]
  fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_generate_defaults() {
    let cli = Cli::try_parse_from(["openapi-reader", "generate", "-i", "petstore.yaml"]).expect("valid arguments");
    let Commands::Generate(command) = cli.command else {
      panic!("expected the generate command");
    };
    assert_eq!(command.input, PathBuf::from("petstore.yaml"));
    assert_eq!(command.output, None);
    assert_eq!(command.framework, Framework::Drf);
    assert_eq!(command.concurrency, Concurrency::Async);
    assert_eq!(command.default_status, 200);
    assert!(!command.lenient_refs);
  }

  #[test]
  fn test_generate_fastapi_sync() {
    let cli = Cli::try_parse_from([
      "openapi-reader",
      "generate",
      "-i",
      "api.json",
      "-o",
      "out",
      "--framework",
      "fastapi",
      "--concurrency",
      "sync",
      "--lenient-refs",
    ])
    .expect("valid arguments");
    let Commands::Generate(command) = cli.command else {
      panic!("expected the generate command");
    };
    assert_eq!(command.output, Some(PathBuf::from("out")));
    assert_eq!(command.framework, Framework::Fastapi);
    assert_eq!(command.concurrency, Concurrency::Sync);
    assert!(command.lenient_refs);
  }

  #[test]
  fn test_list_schemas() {
    let cli = Cli::try_parse_from(["openapi-reader", "list", "schemas", "--input", "api.yaml"]).expect("valid arguments");
    assert!(matches!(
      cli.command,
      Commands::List {
        list_command: ListCommands::Schemas { .. }
      }
    ));
  }

  #[test]
  fn test_unknown_framework_is_rejected() {
    let result = Cli::try_parse_from(["openapi-reader", "generate", "-i", "a.yaml", "--framework", "flask"]);
    assert!(result.is_err());
  }
}
