use std::{env, path::PathBuf};

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "RUSTDB_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "data";

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding one snapshot file per table
    pub data_dir: PathBuf,
}

impl Config {
    /// Defaults, overridden by `RUSTDB_DATA_DIR` when it is set
    pub fn from_env() -> Self {
        match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::default().with_data_dir(dir),
            _ => Self::default(),
        }
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}
