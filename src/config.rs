//! Store configuration
//!
//! Resolved in priority order:
//! 1. CLI flags (`--data-dir`, `--prompt-attempts`)
//! 2. Environment variables (`LOYALTY_DATA_DIR`, `LOYALTY_PROMPT_ATTEMPTS`)
//! 3. Built-in defaults (current directory, 3 attempts)

use crate::types::EntityKind;
use std::env;
use std::path::{Path, PathBuf};

/// Default number of invalid answers accepted per prompt
pub const DEFAULT_PROMPT_ATTEMPTS: u32 = 3;

/// Where stores live and how the interactive shell retries input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding every store and count file
    pub data_dir: PathBuf,

    /// Invalid answers tolerated per prompt before giving up (0 = unbounded)
    pub prompt_attempts: u32,
}

/// Store and count file locations for one entity kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorePaths {
    pub store: PathBuf,
    pub count: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            prompt_attempts: DEFAULT_PROMPT_ATTEMPTS,
        }
    }
}

impl StoreConfig {
    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `LOYALTY_DATA_DIR` - Directory for store files (default: current directory)
    /// - `LOYALTY_PROMPT_ATTEMPTS` - Invalid answers per prompt, 0 for unbounded (default: 3)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = env::var_os("LOYALTY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(attempts) = read_env::<u32>("LOYALTY_PROMPT_ATTEMPTS") {
            config.prompt_attempts = attempts;
        }

        config
    }

    /// Use `data_dir` for every store
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// File locations for `kind` inside the data directory
    pub fn paths(&self, kind: EntityKind) -> StorePaths {
        StorePaths {
            store: self.data_dir.join(kind.store_file()),
            count: self.data_dir.join(kind.count_file()),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
