//! Caller identity, the editor capability, and anti-forgery nonces
//!
//! - [`AuthProvider`] - resolves request headers to a [`Caller`]
//! - [`StaticTokenAuth`] - bearer tokens declared under `[auth.users]`
//! - [`NonceSigner`] - issues and verifies time-ticked nonces

mod nonce;

pub use nonce::{EDITOR_ACTION, NonceSigner};

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer credentials")]
    MissingCredentials,
    #[error("unknown access token")]
    UnknownToken,
    #[error("Insufficient permissions")]
    MissingCapability(Capability),
    #[error("Security check failed")]
    BadNonce,
}

/// Permission flags. Holding [`Capability::EditPages`] grants save, load,
/// delete and list over every page; there is no per-owner scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    EditPages,
}

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user: String,
    pub capabilities: BTreeSet<Capability>,
}

impl Caller {
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn require(&self, capability: Capability) -> Result<(), AuthError> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(AuthError::MissingCapability(capability))
        }
    }
}

/// Source of caller identity for editor requests
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, AuthError>;
}

/// Bearer tokens mapped to users, straight from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuth {
    by_token: HashMap<String, Caller>,
}

impl StaticTokenAuth {
    pub fn from_config(config: &AuthConfig) -> Self {
        let by_token = config
            .users
            .iter()
            .map(|(user, entry)| {
                let caller = Caller {
                    user: user.clone(),
                    capabilities: entry.capabilities.iter().copied().collect(),
                };
                (entry.token.clone(), caller)
            })
            .collect();
        Self { by_token }
    }

    pub fn with_user(mut self, token: &str, caller: Caller) -> Self {
        self.by_token.insert(token.to_string(), caller);
        self
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::MissingCredentials)?;
        self.by_token
            .get(token)
            .cloned()
            .ok_or(AuthError::UnknownToken)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn editor(user: &str) -> Caller {
        Caller {
            user: user.to_string(),
            capabilities: BTreeSet::from([Capability::EditPages]),
        }
    }

    fn headers_with(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    #[test]
    fn test_require_capability() {
        assert!(editor("alice").require(Capability::EditPages).is_ok());

        let viewer = Caller {
            user: "bob".to_string(),
            capabilities: BTreeSet::new(),
        };
        assert_eq!(
            viewer.require(Capability::EditPages),
            Err(AuthError::MissingCapability(Capability::EditPages))
        );
    }

    #[tokio::test]
    async fn test_static_tokens() {
        let auth = StaticTokenAuth::default().with_user("secret-1", editor("alice"));

        let caller = auth.authenticate(&headers_with("Bearer secret-1")).await.unwrap();
        assert_eq!(caller.user, "alice");

        assert_eq!(
            auth.authenticate(&headers_with("Bearer nope")).await,
            Err(AuthError::UnknownToken)
        );
        assert_eq!(
            auth.authenticate(&headers_with("Basic secret-1")).await,
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            auth.authenticate(&HeaderMap::new()).await,
            Err(AuthError::MissingCredentials)
        );
    }
}
