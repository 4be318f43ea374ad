use std::path::Path;

use anyhow::Context;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use openapi_reader_core::document::{self, DocumentFormat};
use serde_json::Value;

/// A memory-mapped OpenAPI document, parsed as YAML or JSON depending on its extension.
pub struct DocumentLoader {
  file: AsyncMmapFile,
  format: DocumentFormat,
}

impl DocumentLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = DocumentFormat::from_path(path);
    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open {}", path.display()))?;

    Ok(Self { file, format })
  }

  pub fn format(&self) -> DocumentFormat {
    self.format
  }

  pub fn parse(&self) -> anyhow::Result<Value> {
    Ok(document::parse(self.file.as_slice(), self.format)?)
  }
}
