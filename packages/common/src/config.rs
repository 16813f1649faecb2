use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Item store configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Upper bound on a single store call, in milliseconds. Default: 5000.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Snapshot loaded at startup and written on shutdown. Default: none (in-memory only).
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
    /// JSON item file inserted at startup; existing items are kept. Default: none.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

fn default_request_timeout_ms() -> u64 {
    5000
}

impl StoreConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            snapshot_path: None,
            seed_path: None,
        }
    }
}
