use std::{collections::HashMap, fs, path::PathBuf};

/// Source of included files. `None` means the file does not exist or could
/// not be read.
pub trait FileReader {
    fn read_file(&self, path: &str) -> Option<String>;
}

/// Reads files from disk, relative to `root` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FsReader {
    root: Option<PathBuf>,
}

impl FsReader {
    pub fn new() -> Self {
        FsReader { root: None }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        FsReader {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }
}

impl FileReader for FsReader {
    fn read_file(&self, path: &str) -> Option<String> {
        let resolved = self.resolve(path);
        match fs::read_to_string(&resolved) {
            Ok(content) => Some(content),
            Err(error) => {
                tracing::debug!(path = %resolved.display(), %error, "failed to read file");
                None
            }
        }
    }
}

/// Serves files from memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    files: HashMap<String, String>,
}

impl MemoryReader {
    pub fn new() -> Self {
        MemoryReader::default()
    }

    pub fn with_file(mut self, name: &str, content: &str) -> Self {
        self.insert(name, content);
        self
    }

    pub fn insert(&mut self, name: &str, content: &str) {
        self.files.insert(name.to_string(), content.to_string());
    }
}

impl FileReader for MemoryReader {
    fn read_file(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }
}
