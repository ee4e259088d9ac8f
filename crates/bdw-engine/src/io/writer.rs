use bdw_sdk::FormatRegistry;

// Buffering and rotation
pub mod buffered;
pub mod file_name;
pub mod rotation;

// Data writers for the supported file formats
pub mod insert_values;
pub mod jsonl;
pub mod parquet;

pub use buffered::{BufferedWriter, GenerationState};
pub use file_name::FileNameTemplate;
pub use rotation::{RotationPolicy, DEFAULT_BUFFER_MAX_ITEMS};

/// Register all built-in file formats
pub fn register_all(registry: &mut FormatRegistry) {
    registry.register("jsonl", jsonl::JsonlFormat);
    registry.register("insert_values", insert_values::InsertValuesFormat);
    registry.register("parquet", parquet::ParquetFormat);
}

/// Registry with all built-in file formats
pub fn default_registry() -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    register_all(&mut registry);
    registry
}
