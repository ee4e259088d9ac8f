use crate::stream::{OpenMode, OutputStream};
use crate::{Result, Sample, TableSchema};

/// Static capabilities of a file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub file_extension: &'static str,
    /// Binary formats get an unbuffered stream; text formats a buffered UTF-8 one
    pub is_binary_format: bool,
    /// Whether the column set may change after the header was written
    pub supports_schema_changes: bool,
}

impl FormatSpec {
    pub fn open_mode(&self) -> OpenMode {
        if self.is_binary_format {
            OpenMode::Binary
        } else {
            OpenMode::Text
        }
    }
}

/// Format-specific encoder bound to one open output stream
///
/// Call order per file: `write_header` once, `write_data` one or more
/// times, `write_footer` once, then `into_stream` to release the stream.
pub trait DataWriter: Send {
    fn write_header(&mut self, columns: &TableSchema) -> Result<()>;

    fn write_data(&mut self, rows: &[Sample]) -> Result<()>;

    fn write_footer(&mut self) -> Result<()>;

    /// Size of the file so far, counting bytes the encoder still holds
    /// in its own buffers
    fn bytes_written(&self) -> u64;

    /// Give back the stream so the caller can close it.
    /// `None` when the encoder lost it (e.g. a failed footer).
    fn into_stream(self: Box<Self>) -> Option<OutputStream>;
}

/// Creates data writers for one file format
pub trait DataWriterFactory: Send + Sync {
    fn spec(&self) -> FormatSpec;

    fn create(&self, stream: OutputStream) -> Box<dyn DataWriter>;
}
