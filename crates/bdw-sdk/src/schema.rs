use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Logical column type carried in a table schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    Bigint,
    Double,
    Bool,
    /// Arrays and objects, stored as serialized JSON
    Json,
}

impl ColumnType {
    /// Infer a column type from a single JSON value
    /// Nulls have no type of their own and default to text
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::String(_) | Value::Null => ColumnType::Text,
            Value::Number(n) if n.is_i64() || n.is_u64() => ColumnType::Bigint,
            Value::Number(_) => ColumnType::Double,
            Value::Bool(_) => ColumnType::Bool,
            Value::Array(_) | Value::Object(_) => ColumnType::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: ColumnType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }
}

/// Column schema of a table: column name -> column spec
///
/// Columns keep the order in which they were added so encoders produce
/// stable headers, but no comparison here depends on that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSchema {
    columns: Vec<ColumnSchema>,
}

impl TableSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from columns; a later column replaces an earlier one with the same name
    pub fn from_columns(columns: impl IntoIterator<Item = ColumnSchema>) -> Self {
        let mut schema = Self::new();
        for column in columns {
            schema.upsert(column);
        }
        schema
    }

    /// Insert a column or replace the spec of an existing one
    pub fn upsert(&mut self, column: ColumnSchema) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    pub fn with_column(mut self, name: impl Into<String>, data_type: ColumnType) -> Self {
        self.upsert(ColumnSchema::new(name, data_type));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Two schemas are count-compatible when they have the same number of columns.
    /// Column identities are not compared.
    pub fn is_count_compatible(&self, other: &TableSchema) -> bool {
        self.len() == other.len()
    }
}
