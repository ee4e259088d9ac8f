use super::Reader;
use bdw_sdk::Sample;

/// A reader that wraps multiple readers and reads from them sequentially
pub struct MultiFileReader {
    readers: Vec<Box<dyn Reader>>,
    current_reader_index: usize,
}

impl MultiFileReader {
    pub fn new(readers: Vec<Box<dyn Reader>>) -> anyhow::Result<Self> {
        if readers.is_empty() {
            return Err(anyhow::anyhow!(
                "MultiFileReader requires at least one reader"
            ));
        }

        Ok(Self {
            readers,
            current_reader_index: 0,
        })
    }
}

impl Iterator for MultiFileReader {
    type Item = anyhow::Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_reader_index < self.readers.len() {
            if let Some(result) = self.readers[self.current_reader_index].next() {
                return Some(result);
            }

            // Current reader is exhausted, move to next
            self.current_reader_index += 1;
        }

        None
    }
}
