//! Request and response bodies for the editor and operator endpoints.
//!
//! Editor calls carry two headers besides their JSON body:
//!
//! - `Authorization: Bearer <token>` identifying the caller
//! - `X-Pagebox-Nonce: <nonce>` obtained from `GET /editor/nonce`
//!
//! A save looks like:
//!
//! ```json
//! {
//!   "page_slug": "My Landing Page",
//!   "file_extension": ".html",
//!   "page_title": "My Landing Page",
//!   "html_content": "<h1>Hello</h1>"
//! }
//! ```
//!
//! and is stored as `my-landing-page.html`, served at
//! `/custom-page/my-landing-page.html`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::editor::PageSummary;
use crate::observability::MetricsSnapshot;

/// Load and delete address a page by its stored file name
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageRef {
    #[serde(default)]
    pub page_slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: String,
    pub action: String,
    pub expires_in_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageListResponse {
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: BTreeMap<String, String>,
    pub metrics: MetricsSnapshot,
    pub version: String,
}
