use crate::infer::SchemaInference;
use crate::io::{BufferedWriter, Reader, ReaderFactory, WriterFactory};
use crate::manifest::Manifest;
use crate::spec::{PipelineSpec, SourceSpec};
use anyhow::Result;
use bdw_sdk::{FormatRegistry, Sample, TableSchema};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub files: Vec<PathBuf>,
    pub total_records: usize,
    pub manifest_path: Option<PathBuf>,
}

/// Stream all source records into the sink and close every file it opened
pub fn run_pipeline(spec: &PipelineSpec, registry: &FormatRegistry) -> Result<RunSummary> {
    spec.validate(registry)?;
    let started = Instant::now();

    let reader = ReaderFactory::create(&spec.source)?;
    let mut writer = WriterFactory::create(&spec.sink, registry)?;
    info!(
        format = %spec.sink.file_format,
        buffer_max_items = spec.sink.buffer_max_items,
        file_max_bytes = ?spec.sink.file_max_bytes,
        "writing records"
    );

    let total_records = match feed(reader, &mut writer, &spec.source) {
        Ok(total) => total,
        Err(e) => {
            // Still finalize what was written so far before reporting the failure
            if let Err(close_err) = writer.close() {
                warn!(error = %close_err, "failed to close writer after error");
            }
            return Err(e);
        }
    };
    let files = writer.finish()?;

    let manifest_path = match &spec.sink.manifest {
        Some(path) => {
            let mut manifest = Manifest::new(spec.sink.file_format.clone());
            for file in &files {
                manifest.add_file(file)?;
            }
            manifest.total_records = total_records;
            manifest.write_to_file(path)?;
            Some(PathBuf::from(path))
        }
        None => None,
    };

    info!(
        records = total_records,
        files = files.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "run completed"
    );

    Ok(RunSummary {
        files,
        total_records,
        manifest_path,
    })
}

/// Append every record; returns the number of records appended
fn feed(
    reader: Box<dyn Reader>,
    writer: &mut BufferedWriter,
    source: &SourceSpec,
) -> Result<usize> {
    let mut inference = SchemaInference::new();
    let mut batch: Vec<Sample> = Vec::with_capacity(source.batch_size);
    let mut total = 0;

    for sample in reader {
        let sample = sample?;
        if source.columns.is_none() {
            inference.observe(&sample);
        }
        batch.push(sample);
        total += 1;

        if batch.len() >= source.batch_size {
            append(writer, &mut batch, columns(source, &inference))?;
        }
    }
    if !batch.is_empty() {
        append(writer, &mut batch, columns(source, &inference))?;
    }

    Ok(total)
}

fn columns<'a>(source: &'a SourceSpec, inference: &'a SchemaInference) -> &'a TableSchema {
    source.columns.as_ref().unwrap_or_else(|| inference.schema())
}

fn append(
    writer: &mut BufferedWriter,
    batch: &mut Vec<Sample>,
    columns: &TableSchema,
) -> Result<()> {
    if batch.len() == 1 {
        if let Some(sample) = batch.pop() {
            writer.append_one(sample, columns)?;
        }
    } else {
        writer.append_batch(batch.drain(..), columns)?;
    }
    Ok(())
}
