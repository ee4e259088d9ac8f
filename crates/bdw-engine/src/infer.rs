use bdw_sdk::{ColumnSchema, ColumnType, Sample, TableSchema};

/// Grows a table schema from the records seen so far
///
/// Columns appear in first-seen order and keep the type of the first value
/// seen for them. Types are never revised.
#[derive(Debug, Default)]
pub struct SchemaInference {
    schema: TableSchema,
}

impl SchemaInference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add columns for fields not seen before and return the current schema
    pub fn observe(&mut self, sample: &Sample) -> &TableSchema {
        for (name, value) in sample.fields() {
            if !self.schema.contains(name) {
                self.schema
                    .upsert(ColumnSchema::new(name.clone(), ColumnType::infer(value)));
            }
        }
        &self.schema
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }
}
