use bdw_sdk::{
    DataWriter, DataWriterFactory, FormatSpec, OutputStream, Result, Sample, TableSchema,
};

/// Newline-delimited JSON; rows carry their own keys so the column set may change freely
pub struct JsonlFormat;

impl DataWriterFactory for JsonlFormat {
    fn spec(&self) -> FormatSpec {
        FormatSpec {
            file_extension: "jsonl",
            is_binary_format: false,
            supports_schema_changes: true,
        }
    }

    fn create(&self, stream: OutputStream) -> Box<dyn DataWriter> {
        Box::new(JsonlWriter::new(stream))
    }
}

pub struct JsonlWriter {
    stream: OutputStream,
}

impl JsonlWriter {
    pub fn new(stream: OutputStream) -> Self {
        Self { stream }
    }
}

impl DataWriter for JsonlWriter {
    fn write_header(&mut self, _columns: &TableSchema) -> Result<()> {
        Ok(())
    }

    fn write_data(&mut self, rows: &[Sample]) -> Result<()> {
        // Serialize the whole chunk first so it goes out in a single write
        let mut output = String::with_capacity(rows.len() * 200);
        for sample in rows {
            output.push_str(&serde_json::to_string(sample.as_value())?);
            output.push('\n');
        }

        self.stream.write_str(&output)?;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.stream.bytes_written()
    }

    fn into_stream(self: Box<Self>) -> Option<OutputStream> {
        Some(self.stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdw_sdk::OpenMode;
    use serde_json::json;

    #[test]
    fn writes_one_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        let stream = OutputStream::create(&path, OpenMode::Text).unwrap();
        let mut writer = JsonlFormat.create(stream);

        writer.write_header(&TableSchema::new()).unwrap();
        writer
            .write_data(&[
                Sample::from_value(json!({"a": 1})).unwrap(),
                Sample::from_value(json!({"a": 2, "b": "x"})).unwrap(),
            ])
            .unwrap();
        assert_eq!(writer.bytes_written(), 24);
        writer.write_footer().unwrap();
        writer.into_stream().unwrap().close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "{\"a\":1}\n{\"a\":2,\"b\":\"x\"}\n");
    }
}
