use bdw_sdk::Sample;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reads one JSON object per line, skipping blank lines
pub struct JsonlReader {
    reader: BufReader<File>,
    path: PathBuf,
    line_number: usize,
}

impl JsonlReader {
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;
        Ok(Self {
            reader: BufReader::new(file),
            path: path.to_path_buf(),
            line_number: 0,
        })
    }

    fn parse_line(&self, line: &str) -> anyhow::Result<Sample> {
        let value: Value = serde_json::from_str(line).map_err(|e| {
            anyhow::anyhow!(
                "Failed to parse JSON at {}:{}: {}",
                self.path.display(),
                self.line_number,
                e
            )
        })?;
        Sample::from_value(value).ok_or_else(|| {
            anyhow::anyhow!(
                "Expected a JSON object at {}:{}",
                self.path.display(),
                self.line_number
            )
        })
    }
}

impl Iterator for JsonlReader {
    type Item = anyhow::Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            self.line_number += 1;
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(_) if line.trim().is_empty() => continue,
                Ok(_) => return Some(self.parse_line(line.trim_end())),
                Err(e) => return Some(Err(anyhow::anyhow!("Failed to read line: {}", e))),
            }
        }
    }
}
