//! Editor operations over the page store
//!
//! [`EditorService`] is built once at startup and shared by every request.
//! Callers are expected to have passed authentication, the capability check
//! and nonce verification before any method here runs.

mod service;

pub use service::EditorService;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Save request, field names as the editor form submits them
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SavePage {
    #[serde(default)]
    pub page_slug: String,
    #[serde(default)]
    pub file_extension: String,
    #[serde(default)]
    pub page_title: String,
    #[serde(default)]
    pub html_content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Created,
    Updated,
}

impl SaveOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SaveOutcome::Created => "Page created successfully",
            SaveOutcome::Updated => "Page updated successfully",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPage {
    pub outcome: SaveOutcome,
    pub message: String,
    pub page_slug: String,
    pub page_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedPage {
    pub page_slug: String,
    pub page_title: String,
    pub html_content: String,
    pub can_edit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub page_slug: String,
    pub page_title: String,
    pub size: u64,
    pub size_human: String,
    pub modified_at: DateTime<Utc>,
    pub page_url: String,
}
