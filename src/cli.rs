//! CLI argument definitions for the datus client.
//!
//! Uses `clap` with derive macros. Resolution priority for settings:
//! CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default service base URL (the local development server).
pub const DEFAULT_API_URL: &str = "http://localhost:8000/";

/// datus — client for the DATUS sales analytics service.
#[derive(Parser, Debug)]
#[command(name = "datus", version, about)]
pub struct CliArgs {
    /// Base URL of the DATUS API service.
    #[arg(long = "api-url")]
    pub api_url: Option<String>,

    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session token.
    Login {
        username: String,
        password: String,
        /// Kept for parity with the web form; tokens persist until logout
        /// either way.
        #[arg(long)]
        remember_me: bool,
    },
    /// Create an account and store the session token.
    Register {
        email: String,
        username: String,
        password: String,
    },
    /// Clear the stored session token.
    Logout,
    /// Upload a sales data file (CSV/Excel) and print the returned summary.
    Upload { file: PathBuf },
    /// Show a sales summary: the latest one, or a specific one by id.
    Summary {
        #[arg(long)]
        id: Option<String>,
    },
    /// Show dashboard statistics.
    Stats,
    /// Fetch the generic data endpoint and print the raw JSON.
    Data,
    /// Show or update the account profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// List recent local upload history.
    History {
        #[arg(long, default_value_t = 10)]
        limit: i64,
    },
    /// Show the session state and where the home route resolves.
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Print the current profile.
    Show,
    /// Update profile fields; only the provided ones are sent.
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        company_name: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        mobile_number: Option<String>,
        /// Path to a new profile picture.
        #[arg(long)]
        picture: Option<PathBuf>,
    },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > DATUS_CONFIG env var > platform default
    /// (`<config-dir>/com.datus.app/config.toml`).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("DATUS_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("com.datus.app")
            .join("config.toml")
    }

    /// Resolve the service base URL.
    ///
    /// Priority: --api-url flag > DATUS_API_URL env var > config file >
    /// default.
    pub fn resolve_api_url(&self, config_url: Option<&str>) -> String {
        if let Some(ref url) = self.api_url {
            return url.clone();
        }
        if let Ok(url) = std::env::var("DATUS_API_URL") {
            if !url.is_empty() {
                return url;
            }
        }
        config_url
            .map(|u| u.to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }
}
