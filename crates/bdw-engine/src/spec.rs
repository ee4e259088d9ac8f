use crate::io::writer::{FileNameTemplate, DEFAULT_BUFFER_MAX_ITEMS};
use anyhow::{Context, Result};
use bdw_sdk::{FormatRegistry, TableSchema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub source: SourceSpec,
    pub sink: SinkSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    /// JSONL files or glob patterns, read in order
    pub uris: Vec<String>,
    /// Fixed columns for every record; inferred from the records when absent
    #[serde(default)]
    pub columns: Option<TableSchema>,
    /// Records per append call; 1 appends records one at a time
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkSpec {
    /// Registered file format name, e.g. "jsonl", "insert_values", "parquet"
    pub file_format: String,
    /// Output path template with one `{id}` placeholder, without extension
    pub file_name_template: String,
    #[serde(default = "default_buffer_max_items")]
    pub buffer_max_items: usize,
    /// Approximate size limit per file; files may exceed it by one flush.
    /// Unset or 0 means no limit.
    #[serde(default)]
    pub file_max_bytes: Option<u64>,
    /// Where to write the JSON manifest of produced files
    #[serde(default)]
    pub manifest: Option<String>,
}

fn default_batch_size() -> usize {
    1
}

fn default_buffer_max_items() -> usize {
    DEFAULT_BUFFER_MAX_ITEMS
}

impl PipelineSpec {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let spec: PipelineSpec =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;
        Ok(spec)
    }

    /// Check everything that can be checked without touching data
    pub fn validate(&self, registry: &FormatRegistry) -> Result<()> {
        if self.source.uris.is_empty() {
            anyhow::bail!("source.uris must list at least one input");
        }
        if self.source.batch_size == 0 {
            anyhow::bail!("source.batch_size must be at least 1");
        }
        self.sink.validate(registry)
    }
}

impl SinkSpec {
    pub fn validate(&self, registry: &FormatRegistry) -> Result<()> {
        let factory = registry
            .get(&self.file_format)
            .with_context(|| format!("Invalid sink file_format '{}'", self.file_format))?;
        FileNameTemplate::new(&self.file_name_template, factory.spec().file_extension)
            .context("Invalid sink file_name_template")?;
        Ok(())
    }
}
