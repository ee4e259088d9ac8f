use super::file_name::FileNameTemplate;
use super::rotation::RotationPolicy;
use bdw_sdk::{
    DataWriter, DataWriterFactory, FormatSpec, OutputStream, Result, Sample, StreamPosition,
    TableSchema,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle of the file currently being assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    /// File name minted, nothing flushed yet; items may sit in the buffer
    Empty,
    /// Header written, stream open
    Open,
}

/// Data writer and stream of the open file
struct OpenFile {
    writer: Box<dyn DataWriter>,
    /// Bytes that reached the stream; final size once the stream is closed
    position: StreamPosition,
    /// Columns written in the header
    columns: TableSchema,
}

/// Buffers samples in memory and writes them into a sequence of files
///
/// A file is opened on the first flush, which writes the header with the
/// columns passed to the latest append. Files are rotated when a
/// non-tolerant format sees a different number of columns, or when the
/// file grew past `file_max_bytes`. The size check runs after the flush
/// step of an append, so files may exceed the limit by one flush.
///
/// Call [`BufferedWriter::close`] or [`BufferedWriter::finish`] on every
/// exit path; dropping the writer leaves the open file unregistered.
pub struct BufferedWriter {
    factory: Arc<dyn DataWriterFactory>,
    format: FormatSpec,
    file_name: FileNameTemplate,
    policy: RotationPolicy,
    current_columns: TableSchema,
    file_path: PathBuf,
    buffered_items: Vec<Sample>,
    open_file: Option<OpenFile>,
    closed_files: Vec<PathBuf>,
}

impl BufferedWriter {
    /// Create a writer and mint the first file name.
    /// Fails with `InvalidFileNameTemplate` if the template cannot render.
    pub fn new(
        factory: Arc<dyn DataWriterFactory>,
        file_name_template: &str,
        buffer_max_items: usize,
        file_max_bytes: Option<u64>,
    ) -> Result<Self> {
        let format = factory.spec();
        let file_name = FileNameTemplate::new(file_name_template, format.file_extension)?;
        let policy = RotationPolicy::new(
            buffer_max_items,
            file_max_bytes,
            format.supports_schema_changes,
        );

        let file_path = file_name.next_path()?;
        debug!(path = %file_path.display(), "new file name");

        Ok(Self {
            factory,
            format,
            file_name,
            policy,
            current_columns: TableSchema::new(),
            file_path,
            buffered_items: Vec::new(),
            open_file: None,
            closed_files: Vec::new(),
        })
    }

    /// Append a single sample described by `columns`
    pub fn append_one(&mut self, sample: Sample, columns: &TableSchema) -> Result<()> {
        self.append(columns, |buffer| buffer.push(sample))
    }

    /// Append samples that share `columns`; they are buffered together
    /// no matter how many there are
    pub fn append_batch(
        &mut self,
        samples: impl IntoIterator<Item = Sample>,
        columns: &TableSchema,
    ) -> Result<()> {
        self.append(columns, |buffer| buffer.extend(samples))
    }

    fn append(
        &mut self,
        columns: &TableSchema,
        buffer_items: impl FnOnce(&mut Vec<Sample>),
    ) -> Result<()> {
        // The new items must not land in a file whose header has a different column count
        let frozen = self.open_file.as_ref().map(|open| &open.columns);
        if self.policy.rotate_on_schema(frozen, columns) {
            info!(
                path = %self.file_path.display(),
                columns = columns.len(),
                "column count changed, rotating file"
            );
            self.rotate()?;
        }

        // Until the first flush the columns can change freely
        if self.current_columns != *columns {
            self.current_columns = columns.clone();
        }

        buffer_items(&mut self.buffered_items);

        if self.policy.flush_on_count(self.buffered_items.len()) {
            self.flush()?;
        }

        if self.policy.rotate_on_size(self.bytes_written()) {
            info!(
                path = %self.file_path.display(),
                bytes = ?self.bytes_written(),
                "file size limit exceeded, rotating file"
            );
            self.rotate()?;
        }

        Ok(())
    }

    /// Write buffered items into the current file, opening it and writing
    /// the header on the first call. Never closes the file.
    pub fn flush(&mut self) -> Result<()> {
        if self.buffered_items.is_empty() {
            return Ok(());
        }

        if self.open_file.is_none() {
            self.open_file = Some(self.open_current_file()?);
        }

        if let Some(open) = self.open_file.as_mut() {
            open.writer.write_data(&self.buffered_items)?;
            debug!(
                items = self.buffered_items.len(),
                bytes = open.writer.bytes_written(),
                path = %self.file_path.display(),
                "flushed buffer"
            );
        }
        self.buffered_items.clear();
        Ok(())
    }

    fn open_current_file(&self) -> Result<OpenFile> {
        let path = self.current_path();
        let stream = OutputStream::create(path, self.format.open_mode())?;
        let position = stream.position();
        let mut writer = self.factory.create(stream);
        writer.write_header(&self.current_columns)?;
        debug!(path = %path.display(), columns = self.current_columns.len(), "opened file");

        Ok(OpenFile {
            writer,
            position,
            columns: self.current_columns.clone(),
        })
    }

    /// Flush remaining items and, if a file is open, finalize and register it.
    /// A registered file is never reopened: later appends go to a new file name.
    pub fn close(&mut self) -> Result<()> {
        if self.close_file()? {
            self.mint_file_name()?;
        }
        Ok(())
    }

    /// Returns true when a file was finalized and registered
    fn close_file(&mut self) -> Result<bool> {
        self.flush()?;

        if let Some(open) = self.open_file.as_mut() {
            open.writer.write_footer()?;
        }

        if let Some(open) = self.open_file.take() {
            if let Some(stream) = open.writer.into_stream() {
                stream.close()?;
            }
            let path = self.file_path.clone();
            info!(path = %path.display(), bytes = open.position.get(), "closed file");
            self.closed_files.push(path);
            return Ok(true);
        }

        Ok(false)
    }

    /// Close the current file and start a new one under a fresh name.
    /// A file that was never flushed is abandoned and produces no output.
    fn rotate(&mut self) -> Result<()> {
        if !self.close_file()? {
            debug!(path = %self.file_path.display(), "abandoning unflushed file");
        }
        self.mint_file_name()
    }

    /// Template errors surface here on every rotation, not only in `new`
    fn mint_file_name(&mut self) -> Result<()> {
        self.file_path = self.file_name.next_path()?;
        debug!(path = %self.file_path.display(), "new file name");
        Ok(())
    }

    /// Close the writer and hand back the paths of all files written, in order
    pub fn finish(mut self) -> Result<Vec<PathBuf>> {
        self.close_file()?;
        Ok(std::mem::take(&mut self.closed_files))
    }

    /// Files closed so far, in close order
    pub fn closed_files(&self) -> &[PathBuf] {
        &self.closed_files
    }

    /// Path of the file being assembled; it exists on disk only once opened
    pub fn current_path(&self) -> &Path {
        &self.file_path
    }

    pub fn current_columns(&self) -> &TableSchema {
        &self.current_columns
    }

    pub fn buffered_len(&self) -> usize {
        self.buffered_items.len()
    }

    pub fn state(&self) -> GenerationState {
        if self.open_file.is_some() {
            GenerationState::Open
        } else {
            GenerationState::Empty
        }
    }

    /// Size of the open file as reported by its data writer, `None` if no file is open
    pub fn bytes_written(&self) -> Option<u64> {
        self.open_file.as_ref().map(|open| open.writer.bytes_written())
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    pub fn format(&self) -> &FormatSpec {
        &self.format
    }
}

impl Drop for BufferedWriter {
    fn drop(&mut self) {
        if self.open_file.is_some() || !self.buffered_items.is_empty() {
            warn!(
                path = %self.file_path.display(),
                buffered = self.buffered_items.len(),
                "buffered writer dropped without close, file left unregistered"
            );
        }
    }
}
