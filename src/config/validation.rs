use super::models::Config;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("public_url '{0}' must start with http:// or https://")]
    InvalidPublicUrl(String),

    #[error("storage.root_dir must not be empty")]
    EmptyRootDir,

    #[error("editor.max_content_bytes must be positive")]
    InvalidContentLimit,

    #[error("auth.nonce_lifetime_secs must be at least 2, got {0}")]
    NonceLifetimeTooShort(u64),

    #[error("user '{0}' has an empty token")]
    EmptyToken(String),

    #[error("user '{0}' reuses a token already assigned to another user")]
    DuplicateToken(String),
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_storage(config)?;
    validate_editor(config)?;
    validate_auth(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    let url = &config.server.public_url;
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidPublicUrl(url.clone()));
    }
    Ok(())
}

fn validate_storage(config: &Config) -> Result<(), ValidationError> {
    if config.storage.root_dir.as_os_str().is_empty() {
        return Err(ValidationError::EmptyRootDir);
    }
    Ok(())
}

fn validate_editor(config: &Config) -> Result<(), ValidationError> {
    if config.editor.max_content_bytes.as_u64() == 0 {
        return Err(ValidationError::InvalidContentLimit);
    }
    Ok(())
}

/// Tokens identify users, so each must be unique and non-empty
fn validate_auth(config: &Config) -> Result<(), ValidationError> {
    if config.auth.nonce_lifetime_secs < 2 {
        return Err(ValidationError::NonceLifetimeTooShort(
            config.auth.nonce_lifetime_secs,
        ));
    }

    let mut seen = HashSet::new();
    for (user, entry) in &config.auth.users {
        if entry.token.trim().is_empty() {
            return Err(ValidationError::EmptyToken(user.clone()));
        }
        if !seen.insert(entry.token.as_str()) {
            return Err(ValidationError::DuplicateToken(user.clone()));
        }
    }

    Ok(())
}
