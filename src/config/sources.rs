use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "PAGEBOX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/pagebox.toml";
const ENV_PREFIX: &str = "PAGEBOX";
const ENV_SEPARATOR: &str = "__";
const NONCE_SECRET_ENV_VAR: &str = "PAGEBOX_NONCE_SECRET";

/// Path from `PAGEBOX_CONFIG`, else `config/pagebox.toml`
fn default_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
///
/// Without an explicit path the file location is resolved after `.env`
/// is read, so `.env` may set `PAGEBOX_CONFIG` too.
pub fn load(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let config_path = config_path.unwrap_or_else(default_path);
    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config);
    Ok(config)
}

/// Secrets are never read from TOML, only from the environment
fn load_secrets(config: &mut Config) {
    if let Ok(secret) = env::var(NONCE_SECRET_ENV_VAR) {
        if !secret.is_empty() {
            config.auth.nonce_secret = Some(secret);
        }
    }
}

/// Load configuration from a specific file plus `PAGEBOX__*` overrides
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // PAGEBOX__STORAGE__ROOT_DIR -> storage.root_dir
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.editor.max_content_bytes.as_u64(), 1024 * 1024);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("pagebox.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9000"
public_url = "https://pages.example.com"

[storage]
root_dir = "/srv/pages"

[editor]
max_content_bytes = "256KB"

[auth]
nonce_lifetime_secs = 7200

[auth.users.alice]
token = "alice-token"
capabilities = ["edit_pages"]

[auth.users.reader]
token = "reader-token"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.server.public_url, "https://pages.example.com");
        assert_eq!(config.storage.root_dir, PathBuf::from("/srv/pages"));
        assert_eq!(config.editor.max_content_bytes.as_u64(), 256 * 1024);
        assert_eq!(config.auth.nonce_lifetime_secs, 7200);
        assert_eq!(config.auth.users.len(), 2);
        assert_eq!(config.auth.users["alice"].capabilities.len(), 1);
        assert!(config.auth.users["reader"].capabilities.is_empty());
        assert!(config.auth.nonce_secret.is_none());
    }

    // Environment overrides are not exercised here: mutating process env
    // from parallel tests is unsound.
}
