pub mod error;
pub mod registry;
pub mod sample;
pub mod schema;
pub mod stream;
pub mod writer;

pub use error::{Result, WriterError};
pub use registry::FormatRegistry;
pub use sample::Sample;
pub use schema::{ColumnSchema, ColumnType, TableSchema};
pub use stream::{OpenMode, OutputStream, StreamPosition};
pub use writer::{DataWriter, DataWriterFactory, FormatSpec};
