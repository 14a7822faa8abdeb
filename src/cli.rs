//! Command-line interface parsing for askcache
//!
//! This module handles parsing of CLI arguments using clap: the gateway base
//! URL, the log level, and which mode to run in (interactive chat, one-shot
//! questions, or a URL submission).

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::remote::{is_valid_url, ApiConfig, DEFAULT_BASE_URL};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The gateway base URL does not parse
    #[error("Invalid base URL: '{0}'. Expected an absolute URL such as https://localhost:8080")]
    InvalidBaseUrl(String),
}

/// askcache - ask the analysis gateway questions, with answers cached per session
#[derive(Parser, Debug)]
#[command(name = "askcache")]
#[command(about = "Cached question answering and URL submission for the analysis gateway")]
#[command(version)]
pub struct Cli {
    /// Gateway base URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to run
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive chat over stdin (default)
    Chat,

    /// Ask one or more questions in order, sharing one cache
    ///
    /// Examples:
    ///   askcache ask "What is Rust?" "what is rust?"
    Ask {
        #[arg(required = true, value_name = "QUESTION")]
        questions: Vec<String>,
    },

    /// Submit a URL for analysis
    Submit {
        #[arg(value_name = "URL")]
        url: String,
    },
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Gateway location
    pub api: ApiConfig,
    /// Default log filter
    pub log_level: String,
    /// Mode to run in
    pub command: Command,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the base URL is not a valid URL
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if !is_valid_url(&cli.base_url) {
            return Err(CliError::InvalidBaseUrl(cli.base_url.clone()));
        }

        Ok(StartupConfig {
            api: ApiConfig::new(cli.base_url.clone()),
            log_level: cli.log_level.clone(),
            command: cli.command.clone().unwrap_or(Command::Chat),
        })
    }
}
