//! Slug-addressed page files
//!
//! - [`slug`] - identifier sanitization
//! - [`FileName`] - a validated entry name inside the page directory
//! - [`PageStore`] - create/read/update/delete/list over that directory
//! - [`ContentFilter`] - HTML allowlist applied before persistence

pub mod filter;
pub mod slug;
mod store;

pub use filter::ContentFilter;
pub use store::{PageStore, StoredFile};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("{0}")]
    Validation(String),

    #[error("content is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: u64 },

    #[error("page not found: {0}")]
    NotFound(String),

    #[error("I/O error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PageError>;

/// Extensions a page may be saved with. Stored bytes are never executed,
/// `.php` included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Extension {
    #[serde(rename = ".php")]
    Php,
    #[serde(rename = ".html")]
    Html,
    #[serde(rename = ".js")]
    Js,
}

impl Extension {
    pub const ALL: [Extension; 3] = [Extension::Php, Extension::Html, Extension::Js];

    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Php => ".php",
            Extension::Html => ".html",
            Extension::Js => ".js",
        }
    }
}

impl FromStr for Extension {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self> {
        Extension::ALL
            .into_iter()
            .find(|ext| ext.as_str() == s.trim())
            .ok_or_else(|| PageError::Validation("Invalid file extension".to_string()))
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a single entry directly inside the page directory.
///
/// Construction rejects anything that could address a path outside it:
/// separators, `..`, NUL, and dot-files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileName(String);

impl FileName {
    /// Validate an exact name, without rewriting it.
    pub fn parse(raw: &str) -> Option<Self> {
        let unsafe_name = raw.is_empty()
            || raw.starts_with('.')
            || raw.contains("..")
            || raw.contains(['/', '\\', '\0']);
        if unsafe_name {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    /// Name produced by a save: `sanitize(slug) + extension`.
    pub fn for_page(slug: &str, extension: Extension) -> Option<Self> {
        let slug = slug::sanitize(slug);
        if slug.is_empty() {
            return None;
        }
        Some(Self(format!("{slug}{extension}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased text after the last dot, if any.
    pub fn extension(&self) -> Option<String> {
        self.0
            .rfind('.')
            .map(|dot| self.0[dot + 1..].to_ascii_lowercase())
    }

    pub fn title(&self) -> &str {
        slug::title_from_filename(&self.0)
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
