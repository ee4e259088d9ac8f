use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// How an output file is opened, chosen by the file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// UTF-8 text, buffered in the stream
    Text,
    /// Raw bytes; the encoder does its own buffering
    Binary,
}

/// Shared read handle on the number of bytes written to a stream.
/// Stays readable after the stream itself moved into an encoder.
#[derive(Debug, Clone, Default)]
pub struct StreamPosition(Arc<AtomicU64>);

impl StreamPosition {
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn advance(&self, n: usize) {
        self.0.fetch_add(n as u64, Ordering::Relaxed);
    }
}

enum Sink {
    Text(BufWriter<File>),
    Binary(File),
}

/// An open output file that counts the bytes written through it
pub struct OutputStream {
    path: PathBuf,
    mode: OpenMode,
    sink: Sink,
    position: StreamPosition,
}

impl OutputStream {
    /// Create (or truncate) the file at `path`, creating parent directories as needed
    pub fn create(path: impl AsRef<Path>, mode: OpenMode) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(path)?;
        let sink = match mode {
            OpenMode::Text => Sink::Text(BufWriter::new(file)),
            OpenMode::Binary => Sink::Binary(file),
        };

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            sink,
            position: StreamPosition::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Handle for reading the running byte count
    pub fn position(&self) -> StreamPosition {
        self.position.clone()
    }

    pub fn bytes_written(&self) -> u64 {
        self.position.get()
    }

    /// Write a string; the only way text formats should emit data
    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_all(s.as_bytes())
    }

    /// Flush buffered bytes and close the file
    pub fn close(mut self) -> io::Result<()> {
        self.flush()?;
        match self.sink {
            Sink::Text(writer) => {
                let file = writer.into_inner().map_err(|e| e.into_error())?;
                file.sync_all()
            }
            Sink::Binary(file) => file.sync_all(),
        }
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = match &mut self.sink {
            Sink::Text(writer) => writer.write(buf)?,
            Sink::Binary(file) => file.write(buf)?,
        };
        self.position.advance(n);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Text(writer) => writer.flush(),
            Sink::Binary(file) => file.flush(),
        }
    }
}

impl std::fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("bytes_written", &self.bytes_written())
            .finish()
    }
}
