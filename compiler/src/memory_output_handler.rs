use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::lang::{OutputHandler, GeneratorError};


/// Keeps generated files in memory, keyed by path.
pub struct MemoryOutputHandler {
    pub files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryOutputHandler {
    pub fn new() -> Self {
        MemoryOutputHandler {
            files: HashMap::new(),
        }
    }

    /// The content of a generated file, if it exists and is valid UTF-8.
    pub fn contents<P: AsRef<Path>>(&self, path: P) -> Option<&str> {
        self.files.get(path.as_ref()).and_then(|data| std::str::from_utf8(data).ok())
    }
}

impl <'output> OutputHandler<'output> for MemoryOutputHandler {
    type FileHandle = &'output mut Vec<u8>;
    fn create_file<P: AsRef<Path>>(&'output mut self, path: P) -> Result<Self::FileHandle, GeneratorError> {
        let data = self.files.entry(path.as_ref().to_path_buf()).or_insert_with(Vec::new);
        data.clear();
        Ok(data)
    }
}
