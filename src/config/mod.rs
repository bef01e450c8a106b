//! Configuration management for pagebox
//!
//! Settings are layered, lowest priority first:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! # Environment Variables
//!
//! Any key can be overridden with `PAGEBOX__<section>__<key>`, e.g.
//! `PAGEBOX__STORAGE__ROOT_DIR=/srv/pages` or
//! `PAGEBOX__EDITOR__MAX_CONTENT_BYTES=2MB`.
//!
//! The nonce signing key is only ever read from `PAGEBOX_NONCE_SECRET`.
//!
//! # Configuration File
//!
//! By default the file is `config/pagebox.toml`; `PAGEBOX_CONFIG` or the
//! `--config` flag point elsewhere.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{AuthConfig, Config, EditorConfig, ServerConfig, StorageConfig, UserConfig};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from the default path, `.env` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load(None)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Same as [`Config::load`] but reading the given file
    pub fn load_with_secrets(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load(Some(path))?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path, without `.env` or secrets
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
