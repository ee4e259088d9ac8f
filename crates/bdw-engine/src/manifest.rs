use serde::{Deserialize, Serialize};
use std::path::Path;

/// Summary of one run: the files it produced, in close order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub file_format: String,
    pub files: Vec<FileManifest>,
    pub total_records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileManifest {
    pub path: String,
    pub size_bytes: u64,
}

impl Manifest {
    pub fn new(file_format: String) -> Self {
        Self {
            file_format,
            ..Default::default()
        }
    }

    /// Record a closed file, reading its size from disk
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let size_bytes = std::fs::metadata(path)?.len();
        self.files.push(FileManifest {
            path: path.to_string_lossy().to_string(),
            size_bytes,
        });
        Ok(())
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("a.jsonl");
        std::fs::write(&data, "{}\n").unwrap();

        let mut manifest = Manifest::new("jsonl".to_string());
        manifest.add_file(&data).unwrap();
        manifest.total_records = 1;
        let out = dir.path().join("meta/manifest.json");
        manifest.write_to_file(&out).unwrap();

        let loaded = Manifest::read_from_file(&out).unwrap();
        assert_eq!(loaded.files.len(), 1);
        assert_eq!(loaded.files[0].size_bytes, 3);
        assert_eq!(loaded.total_records, 1);
    }
}
