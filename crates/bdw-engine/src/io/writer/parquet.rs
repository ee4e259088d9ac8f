use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use bdw_sdk::{
    ColumnType, DataWriter, DataWriterFactory, FormatSpec, OutputStream, Result, Sample,
    StreamPosition, TableSchema, WriterError,
};
use parquet::arrow::ArrowWriter;
use serde_json::Value;
use std::sync::Arc;

/// Apache Parquet. The Arrow schema is fixed when the header is written.
pub struct ParquetFormat;

impl DataWriterFactory for ParquetFormat {
    fn spec(&self) -> FormatSpec {
        FormatSpec {
            file_extension: "parquet",
            is_binary_format: true,
            supports_schema_changes: false,
        }
    }

    fn create(&self, stream: OutputStream) -> Box<dyn DataWriter> {
        Box::new(ParquetWriter::new(stream))
    }
}

pub struct ParquetWriter {
    // Holds the stream until the header moves it into the ArrowWriter,
    // and again after the footer hands it back
    stream: Option<OutputStream>,
    writer: Option<ArrowWriter<OutputStream>>,
    schema: Option<SchemaRef>,
    position: StreamPosition,
}

impl ParquetWriter {
    pub fn new(stream: OutputStream) -> Self {
        Self {
            position: stream.position(),
            stream: Some(stream),
            writer: None,
            schema: None,
        }
    }
}

/// Map table columns onto an Arrow schema
pub fn arrow_schema(columns: &TableSchema) -> SchemaRef {
    let fields: Vec<Field> = columns
        .columns()
        .iter()
        .map(|c| {
            let data_type = match c.data_type {
                ColumnType::Text | ColumnType::Json => DataType::Utf8,
                ColumnType::Bigint => DataType::Int64,
                ColumnType::Double => DataType::Float64,
                ColumnType::Bool => DataType::Boolean,
            };
            Field::new(&c.name, data_type, c.nullable)
        })
        .collect();
    Arc::new(Schema::new(fields))
}

fn samples_to_batch(samples: &[Sample], target_schema: &SchemaRef) -> Result<RecordBatch> {
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(target_schema.fields().len());

    for field in target_schema.fields() {
        let field_name = field.name();

        // Values of the wrong JSON type are written as nulls
        let array: ArrayRef = match field.data_type() {
            DataType::Utf8 => {
                let mut builder = StringBuilder::new();
                for sample in samples {
                    match sample.get(field_name) {
                        None | Some(Value::Null) => builder.append_null(),
                        Some(Value::String(s)) => builder.append_value(s),
                        Some(other) => builder.append_value(serde_json::to_string(other)?),
                    }
                }
                Arc::new(builder.finish())
            }
            DataType::Int64 => {
                let mut builder = Int64Builder::new();
                for sample in samples {
                    builder.append_option(sample.get(field_name).and_then(Value::as_i64));
                }
                Arc::new(builder.finish())
            }
            DataType::Float64 => {
                let mut builder = Float64Builder::new();
                for sample in samples {
                    builder.append_option(sample.get(field_name).and_then(Value::as_f64));
                }
                Arc::new(builder.finish())
            }
            DataType::Boolean => {
                let mut builder = BooleanBuilder::new();
                for sample in samples {
                    builder.append_option(sample.get(field_name).and_then(Value::as_bool));
                }
                Arc::new(builder.finish())
            }
            other => {
                return Err(WriterError::Protocol(format!(
                    "unsupported data type: {:?}",
                    other
                )));
            }
        };

        arrays.push(array);
    }

    Ok(RecordBatch::try_new(Arc::clone(target_schema), arrays)?)
}

impl DataWriter for ParquetWriter {
    fn write_header(&mut self, columns: &TableSchema) -> Result<()> {
        let stream = self
            .stream
            .take()
            .ok_or_else(|| WriterError::Protocol("header already written".into()))?;
        let schema = arrow_schema(columns);
        self.writer = Some(ArrowWriter::try_new(stream, schema.clone(), None)?);
        self.schema = Some(schema);
        Ok(())
    }

    fn write_data(&mut self, rows: &[Sample]) -> Result<()> {
        let (writer, schema) = match (self.writer.as_mut(), self.schema.as_ref()) {
            (Some(writer), Some(schema)) => (writer, schema),
            _ => {
                return Err(WriterError::Protocol(
                    "write_data called before write_header".into(),
                ))
            }
        };

        let batch = samples_to_batch(rows, schema)?;
        writer.write(&batch)?;
        // One row group per flush; the ArrowWriter still buffers the encoded bytes
        writer.flush()?;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| {
                WriterError::Protocol("write_footer called before write_header".into())
            })?;
        self.stream = Some(writer.into_inner()?);
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        match &self.writer {
            Some(writer) => writer.bytes_written() as u64,
            None => self.position.get(),
        }
    }

    fn into_stream(self: Box<Self>) -> Option<OutputStream> {
        self.stream
    }
}
