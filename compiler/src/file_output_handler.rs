use std::fs;
use std::fs::File;
use std::path::Path;
use crate::lang::{OutputHandler, GeneratorError};
use log::debug;


/// Writes generated files below their paths on the file system.
pub struct FileOutputHandler {}

impl <'a> OutputHandler<'a> for FileOutputHandler {
    type FileHandle = File;
    fn create_file<P: AsRef<Path>>(&'a mut self, path: P) -> Result<Self::FileHandle, GeneratorError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        debug!("creating {}", path.display());
        Ok(File::create(path)?)
    }
}
