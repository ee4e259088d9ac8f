use bdw_sdk::TableSchema;

/// Default number of items held in memory before a flush
pub const DEFAULT_BUFFER_MAX_ITEMS: usize = 5000;

/// Decides when the buffered writer flushes and when it starts a new file
///
/// Each trigger is checked at a fixed point of an append:
/// schema before buffering, count after buffering, size after the count step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub buffer_max_items: usize,
    /// Soft limit: checked only after a flush, so a file can overshoot it
    /// by up to one flush worth of data. `Some(0)` means no limit.
    pub file_max_bytes: Option<u64>,
    pub supports_schema_changes: bool,
}

impl RotationPolicy {
    pub fn new(
        buffer_max_items: usize,
        file_max_bytes: Option<u64>,
        supports_schema_changes: bool,
    ) -> Self {
        Self {
            buffer_max_items,
            file_max_bytes,
            supports_schema_changes,
        }
    }

    /// `frozen` is the schema written in the header of the open file, if any.
    /// Until the first flush there is nothing frozen and any change is allowed.
    pub fn rotate_on_schema(&self, frozen: Option<&TableSchema>, incoming: &TableSchema) -> bool {
        match frozen {
            Some(frozen) => !self.supports_schema_changes && !frozen.is_count_compatible(incoming),
            None => false,
        }
    }

    pub fn flush_on_count(&self, buffered: usize) -> bool {
        buffered > self.buffer_max_items
    }

    /// `bytes_written` is the size of the open stream, `None` when no file is open
    pub fn rotate_on_size(&self, bytes_written: Option<u64>) -> bool {
        match (self.file_max_bytes, bytes_written) {
            (Some(max), Some(written)) if max > 0 => written > max,
            _ => false,
        }
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_MAX_ITEMS, None, false)
    }
}
