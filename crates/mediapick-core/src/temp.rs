//! App-private temp file store for intermediate and output files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::PickerConfig;

/// Creates uniquely named files in the configured cache directory.
///
/// Files are not cleaned up automatically: outputs are handed to the caller,
/// and intermediates are deleted explicitly by the pipeline.
#[derive(Clone, Debug)]
pub struct TempStore {
    cache_dir: PathBuf,
    prefix: String,
}

impl TempStore {
    pub fn new(config: &PickerConfig) -> Self {
        Self {
            cache_dir: config.cache_dir.clone(),
            prefix: config.file_prefix.clone(),
        }
    }

    /// Create an empty file named `<prefix><uuid>.<extension>`.
    pub fn create(&self, extension: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.cache_dir)?;
        let name = format!("{}{}.{}", self.prefix, Uuid::new_v4(), extension);
        let path = self.cache_dir.join(name);
        fs::File::create(&path)?;
        Ok(path)
    }

    /// Best-effort delete; a failure is logged and otherwise ignored.
    pub fn delete(path: &Path) {
        if let Err(err) = fs::remove_file(path) {
            tracing::debug!(path = %path.display(), error = %err, "could not delete temp file");
        }
    }
}
