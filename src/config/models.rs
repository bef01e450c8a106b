use crate::auth::Capability;
use crate::humanize::ByteSize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Base URL public page links are built from (`{public_url}/custom-page/{name}`)
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            public_url: default_public_url(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

/// Where page files live
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("data/custom-html-pages")
}

/// Editor limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EditorConfig {
    #[serde(default = "default_max_content_bytes")]
    pub max_content_bytes: ByteSize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_content_bytes: default_max_content_bytes(),
        }
    }
}

fn default_max_content_bytes() -> ByteSize {
    ByteSize(1024 * 1024) // 1 MB
}

/// Editor authentication
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_nonce_lifetime_secs")]
    pub nonce_lifetime_secs: u64,
    /// Nonce signing key (loaded from environment, not from config file)
    #[serde(skip)]
    pub nonce_secret: Option<String>,
    #[serde(default)]
    pub users: BTreeMap<String, UserConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            nonce_lifetime_secs: default_nonce_lifetime_secs(),
            nonce_secret: None,
            users: BTreeMap::new(),
        }
    }
}

fn default_nonce_lifetime_secs() -> u64 {
    24 * 60 * 60
}

/// One editor account
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserConfig {
    pub token: String,
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}
