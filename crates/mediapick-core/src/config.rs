//! Picker configuration, loadable from the environment.

use std::path::PathBuf;

use serde::Deserialize;

const DEFAULT_FILE_PREFIX: &str = "mediapick_temp_";
const DEFAULT_FFPROBE_PATH: &str = "ffprobe";

/// Configuration for temp storage and external tooling.
#[derive(Clone, Debug, Deserialize)]
pub struct PickerConfig {
    /// Directory for app-private intermediate files. Contents are
    /// disposable; nothing outlives the acquisition flow except files
    /// returned to the caller.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Binary used for video container metadata.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,
}

fn default_cache_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

fn default_ffprobe_path() -> String {
    DEFAULT_FFPROBE_PATH.to_string()
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            file_prefix: default_file_prefix(),
            ffprobe_path: default_ffprobe_path(),
        }
    }
}

impl PickerConfig {
    /// Load from `MEDIAPICK_`-prefixed environment variables, falling back to
    /// defaults for anything unset. Reads a `.env` file when present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::prefixed("MEDIAPICK_").from_env::<PickerConfig>()?;
        Ok(config)
    }
}
