#![allow(dead_code)]

use bdw_sdk::{
    DataWriter, DataWriterFactory, FormatSpec, OpenMode, OutputStream, Result, Sample,
    TableSchema, WriterError,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Calls seen by recording data writers, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Header {
        path: PathBuf,
        columns: usize,
        mode: OpenMode,
    },
    Data {
        path: PathBuf,
        rows: usize,
    },
    Footer {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Header,
    Data,
    Footer,
    /// Footer succeeds, closing the stream fails
    Close,
}

/// Test format that writes rows as JSON lines and records every call
#[derive(Clone, Default)]
pub struct RecordingFormat {
    pub supports_schema_changes: bool,
    pub is_binary_format: bool,
    pub fail_on: Option<FailPoint>,
    pub events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(point: FailPoint) -> Self {
        Self {
            fail_on: Some(point),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Row counts of all data writes, in order
    pub fn flushes(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Data { rows, .. } => Some(rows),
                _ => None,
            })
            .collect()
    }
}

impl DataWriterFactory for RecordingFormat {
    fn spec(&self) -> FormatSpec {
        FormatSpec {
            file_extension: "rec",
            is_binary_format: self.is_binary_format,
            supports_schema_changes: self.supports_schema_changes,
        }
    }

    fn create(&self, stream: OutputStream) -> Box<dyn DataWriter> {
        Box::new(RecordingWriter {
            stream,
            fail_on: self.fail_on,
            events: Arc::clone(&self.events),
        })
    }
}

struct RecordingWriter {
    stream: OutputStream,
    fail_on: Option<FailPoint>,
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingWriter {
    fn check(&self, point: FailPoint) -> Result<()> {
        if self.fail_on == Some(point) {
            return Err(WriterError::Io(std::io::Error::other(format!(
                "injected {:?} failure",
                point
            ))));
        }
        Ok(())
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl DataWriter for RecordingWriter {
    fn write_header(&mut self, columns: &TableSchema) -> Result<()> {
        self.check(FailPoint::Header)?;
        self.record(Event::Header {
            path: self.stream.path().to_path_buf(),
            columns: columns.len(),
            mode: self.stream.mode(),
        });
        Ok(())
    }

    fn write_data(&mut self, rows: &[Sample]) -> Result<()> {
        self.check(FailPoint::Data)?;
        for row in rows {
            self.stream
                .write_str(&format!("{}\n", serde_json::to_string(row.as_value())?))?;
        }
        self.record(Event::Data {
            path: self.stream.path().to_path_buf(),
            rows: rows.len(),
        });
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        self.check(FailPoint::Footer)?;
        self.record(Event::Footer {
            path: self.stream.path().to_path_buf(),
        });
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.stream.bytes_written()
    }

    fn into_stream(self: Box<Self>) -> Option<OutputStream> {
        if self.fail_on == Some(FailPoint::Close) {
            // Pending bytes for /dev/full fail the final flush with ENOSPC
            let mut stream = OutputStream::create("/dev/full", OpenMode::Text).ok()?;
            stream.write_str("pending").ok()?;
            return Some(stream);
        }
        Some(self.stream)
    }
}

pub fn sample(id: i64) -> Sample {
    Sample::from_value(json!({"id": id, "name": format!("row-{}", id)})).unwrap()
}

pub fn columns(names: &[&str]) -> TableSchema {
    names.iter().fold(TableSchema::new(), |schema, name| {
        schema.with_column(*name, bdw_sdk::ColumnType::Text)
    })
}

pub fn template(dir: &tempfile::TempDir) -> String {
    dir.path().join("part.{id}").to_string_lossy().to_string()
}

pub fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
