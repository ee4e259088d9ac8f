use crate::writer::DataWriterFactory;
use crate::{Result, WriterError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maps file format names (as used in configuration) to writer factories
#[derive(Default, Clone)]
pub struct FormatRegistry {
    factories: BTreeMap<String, Arc<dyn DataWriterFactory>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one with the same name
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: DataWriterFactory + 'static,
    {
        self.factories.insert(name.to_string(), Arc::new(factory));
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn DataWriterFactory>> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| WriterError::UnknownFormat(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered format names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::OutputStream;
    use crate::writer::{DataWriter, FormatSpec};

    struct NullFormat;

    impl DataWriterFactory for NullFormat {
        fn spec(&self) -> FormatSpec {
            FormatSpec {
                file_extension: "null",
                is_binary_format: false,
                supports_schema_changes: true,
            }
        }

        fn create(&self, _stream: OutputStream) -> Box<dyn DataWriter> {
            unreachable!("not opened in registry tests")
        }
    }

    #[test]
    fn lookup_by_name() {
        let mut registry = FormatRegistry::new();
        registry.register("null", NullFormat);

        assert!(registry.contains("null"));
        assert_eq!(registry.get("null").unwrap().spec().file_extension, "null");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["null"]);
    }

    #[test]
    fn unknown_format_is_config_error() {
        let registry = FormatRegistry::new();
        let err = registry.get("csv").err().unwrap();
        assert!(matches!(err, WriterError::UnknownFormat(ref name) if name == "csv"));
        assert!(err.is_config_error());
    }
}
