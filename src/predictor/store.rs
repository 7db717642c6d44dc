// src/predictor/store.rs
use std::fs;
use std::io;
use std::path::PathBuf;

/// Byte-level access to the artifact files.
pub trait ArtifactStore: Send + Sync {
    fn read(&self, file_name: &str) -> io::Result<Vec<u8>>;

    /// Human-readable location, for log lines.
    fn location(&self) -> String;
}

/// Artifacts stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactStore for DirectoryStore {
    fn read(&self, file_name: &str) -> io::Result<Vec<u8>> {
        let path = self.root.join(file_name);
        fs::read(&path).map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
pub use memory::MemoryStore;
