use bdw_sdk::{
    DataWriter, DataWriterFactory, FormatSpec, OutputStream, Result, Sample, TableSchema,
    WriterError,
};
use serde_json::Value;

/// SQL `INSERT ... VALUES` script. The table name is left as a `{}` placeholder
/// for the loader to fill in. Columns are fixed by the header, so a file cannot
/// follow schema changes.
pub struct InsertValuesFormat;

impl DataWriterFactory for InsertValuesFormat {
    fn spec(&self) -> FormatSpec {
        FormatSpec {
            file_extension: "insert_values",
            is_binary_format: false,
            supports_schema_changes: false,
        }
    }

    fn create(&self, stream: OutputStream) -> Box<dyn DataWriter> {
        Box::new(InsertValuesWriter::new(stream))
    }
}

pub struct InsertValuesWriter {
    stream: OutputStream,
    headers: Option<Vec<String>>,
    rows_written: usize,
}

impl InsertValuesWriter {
    pub fn new(stream: OutputStream) -> Self {
        Self {
            stream,
            headers: None,
            rows_written: 0,
        }
    }
}

fn escape_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn escape_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn sql_value(value: Option<&Value>) -> Result<String> {
    Ok(match value {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::Bool(true)) => "TRUE".to_string(),
        Some(Value::Bool(false)) => "FALSE".to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => escape_literal(s),
        Some(complex) => escape_literal(&serde_json::to_string(complex)?),
    })
}

impl DataWriter for InsertValuesWriter {
    fn write_header(&mut self, columns: &TableSchema) -> Result<()> {
        let headers: Vec<String> = columns.names().map(str::to_string).collect();
        let quoted: Vec<String> = headers.iter().map(|h| escape_identifier(h)).collect();
        self.stream
            .write_str(&format!("INSERT INTO {{}}({})\nVALUES\n", quoted.join(",")))?;
        self.headers = Some(headers);
        Ok(())
    }

    fn write_data(&mut self, rows: &[Sample]) -> Result<()> {
        let headers = self
            .headers
            .as_ref()
            .ok_or_else(|| WriterError::Protocol("write_data called before write_header".into()))?;

        let mut output = String::new();
        for sample in rows {
            if self.rows_written > 0 {
                output.push_str(",\n");
            }
            let values = headers
                .iter()
                .map(|h| sql_value(sample.get(h)))
                .collect::<Result<Vec<_>>>()?;
            output.push('(');
            output.push_str(&values.join(","));
            output.push(')');
            self.rows_written += 1;
        }

        self.stream.write_str(&output)?;
        Ok(())
    }

    fn write_footer(&mut self) -> Result<()> {
        self.stream.write_str(";")?;
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.stream.bytes_written()
    }

    fn into_stream(self: Box<Self>) -> Option<OutputStream> {
        Some(self.stream)
    }
}
