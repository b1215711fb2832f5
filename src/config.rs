//! Optional `config.toml` under the app config directory.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Base URL of the DATUS API service.
    pub api_base_url: Option<String>,
    /// Per-request timeout in seconds (default 30).
    pub request_timeout_secs: Option<u64>,
    /// Default log level when RUST_LOG is unset.
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Load from the given path; a missing or unreadable file yields
    /// defaults, an invalid one is reported and ignored.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Ignoring invalid config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
