use anyhow::Context;
use bdw_sdk::FormatRegistry;
use std::path::PathBuf;

use crate::spec::{SinkSpec, SourceSpec};

// Reader trait and implementations
pub mod reader;

pub use reader::{jsonl::JsonlReader, multi_file::MultiFileReader, Reader};

// Buffered writer and data writers
pub mod writer;

pub use writer::{BufferedWriter, FileNameTemplate, RotationPolicy};

/// Factory for creating readers based on source configuration
pub struct ReaderFactory;

impl ReaderFactory {
    /// Expand source uris into input files. Plain paths are kept as given,
    /// glob patterns expand to their matches in sorted order.
    pub fn resolve(spec: &SourceSpec) -> anyhow::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for uri in &spec.uris {
            if !uri.contains(|c: char| matches!(c, '*' | '?' | '[')) {
                paths.push(PathBuf::from(uri));
                continue;
            }

            let mut matched: Vec<PathBuf> = glob::glob(uri)
                .with_context(|| format!("Invalid glob pattern: {}", uri))?
                .collect::<Result<_, _>>()?;
            if matched.is_empty() {
                anyhow::bail!("No input files match {}", uri);
            }
            matched.sort();
            paths.extend(matched);
        }
        Ok(paths)
    }

    /// Create a reader over all inputs of the source spec
    pub fn create(spec: &SourceSpec) -> anyhow::Result<Box<dyn Reader>> {
        let readers = Self::resolve(spec)?
            .into_iter()
            .map(|path| Ok(Box::new(JsonlReader::new(path)?) as Box<dyn Reader>))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Box::new(MultiFileReader::new(readers)?))
    }
}

/// Factory for creating buffered writers based on sink configuration
pub struct WriterFactory;

impl WriterFactory {
    pub fn create(spec: &SinkSpec, registry: &FormatRegistry) -> anyhow::Result<BufferedWriter> {
        let factory = registry.get(&spec.file_format)?;
        let writer = BufferedWriter::new(
            factory,
            &spec.file_name_template,
            spec.buffer_max_items,
            spec.file_max_bytes,
        )?;
        Ok(writer)
    }
}
