use serde_json::Value;

/// Sample is a wrapper around serde_json::Value
/// It represents one record handed to a writer (a JSON object)
#[derive(Clone, Debug, PartialEq)]
pub struct Sample(pub Value);

impl Sample {
    /// Create a new empty JSON object
    pub fn new() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    /// Create from a JSON Value, rejecting anything that is not an object
    pub fn from_value(value: Value) -> Option<Self> {
        if value.is_object() {
            Some(Sample(value))
        } else {
            None
        }
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, k: &str) -> Option<&Value> {
        self.0.get(k)
    }

    /// Iterate over (field, value) pairs in the object
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.as_object().into_iter().flat_map(|map| map.iter())
    }

    pub fn len(&self) -> usize {
        self.0.as_object().map_or(0, |map| map.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_value(&mut self, k: impl Into<String>, v: Value) {
        if let Value::Object(ref mut map) = self.0 {
            map.insert(k.into(), v);
        }
    }

    pub fn set_str(&mut self, k: impl Into<String>, v: impl Into<String>) {
        self.set_value(k, Value::String(v.into()));
    }

    pub fn set_i64(&mut self, k: impl Into<String>, v: i64) {
        self.set_value(k, Value::Number(v.into()));
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self::new()
    }
}

impl From<serde_json::Map<String, Value>> for Sample {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Sample(Value::Object(map))
    }
}
