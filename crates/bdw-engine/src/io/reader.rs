use bdw_sdk::Sample;

/// Unified reader trait for record sources
/// Returns samples one by one (generator-like API)
pub trait Reader: Iterator<Item = anyhow::Result<Sample>> {}

impl<T: Iterator<Item = anyhow::Result<Sample>>> Reader for T {}

pub mod jsonl;
pub mod multi_file;
