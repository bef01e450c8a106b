use std::sync::Arc;

use tracing::{debug, info};

use super::{LoadedPage, PageSummary, SaveOutcome, SavePage, SavedPage};
use crate::config::Config;
use crate::humanize::ByteSize;
use crate::pages::{ContentFilter, Extension, FileName, PageError, PageStore, Result};

const REQUIRED_FIELDS: &str = "All fields are required";
const NOT_UTF8: &str = "Page content is not valid UTF-8";

pub struct EditorService {
    store: Arc<PageStore>,
    filter: ContentFilter,
    max_content_bytes: u64,
    public_url: String,
}

impl EditorService {
    pub fn new(store: Arc<PageStore>, config: &Config) -> Self {
        Self {
            store,
            filter: ContentFilter::new(),
            max_content_bytes: config.editor.max_content_bytes.as_u64(),
            public_url: config.server.public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    fn page_url(&self, name: &FileName) -> String {
        format!("{}/custom-page/{}", self.public_url, name)
    }

    /// Create or overwrite `sanitize(page_slug) + file_extension`.
    ///
    /// Every body passes through the HTML allowlist first, `.js` included.
    /// The slug, the title and the filtered body must all be non-empty.
    pub async fn save(&self, request: SavePage) -> Result<SavedPage> {
        let extension: Extension = request.file_extension.parse()?;

        let size = request.html_content.len();
        if size as u64 > self.max_content_bytes {
            return Err(PageError::TooLarge {
                size,
                limit: self.max_content_bytes,
            });
        }

        let content = self.filter.clean(&request.html_content);

        if request.page_title.trim().is_empty() || content.trim().is_empty() {
            return Err(PageError::Validation(REQUIRED_FIELDS.to_string()));
        }
        let name = FileName::for_page(&request.page_slug, extension)
            .ok_or_else(|| PageError::Validation(REQUIRED_FIELDS.to_string()))?;

        let outcome = if self.store.exists(&name).await? {
            SaveOutcome::Updated
        } else {
            SaveOutcome::Created
        };
        self.store.write(&name, content.as_bytes()).await?;

        info!(name = %name, ?outcome, "Saved page");
        Ok(SavedPage {
            outcome,
            message: outcome.message().to_string(),
            page_url: self.page_url(&name),
            page_slug: name.to_string(),
        })
    }

    /// Read a page by the exact stored name `list` reports.
    ///
    /// The name is checked, not sanitized: `My-Page.html` only loads if a
    /// file with exactly that name exists, and `../x.html` never does.
    /// Bodies that are not UTF-8 are a validation error, never rewritten.
    pub async fn load(&self, page_slug: &str) -> Result<LoadedPage> {
        let name = stored_name(page_slug)?;
        let data = self.store.read(&name).await?;

        debug!(name = %name, size = data.len(), "Loaded page");
        let html_content = String::from_utf8(data.to_vec())
            .map_err(|_| PageError::Validation(NOT_UTF8.to_string()))?;
        Ok(LoadedPage {
            page_title: name.title().to_string(),
            html_content,
            can_edit: true,
            page_slug: name.to_string(),
        })
    }

    /// Remove a page by exact stored name, same name rules as [`Self::load`]
    pub async fn delete(&self, page_slug: &str) -> Result<()> {
        let name = stored_name(page_slug)?;
        self.store.delete(&name).await
    }

    /// Every stored file, newest first
    pub async fn list(&self) -> Result<Vec<PageSummary>> {
        let mut files = self.store.list().await?;
        files.sort_by(|a, b| {
            b.modified_at
                .cmp(&a.modified_at)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(files
            .into_iter()
            .map(|file| PageSummary {
                page_title: file.name.title().to_string(),
                size: file.size,
                size_human: ByteSize(file.size).to_human_readable(),
                modified_at: file.modified_at,
                page_url: self.page_url(&file.name),
                page_slug: file.name.to_string(),
            })
            .collect())
    }
}

fn stored_name(raw: &str) -> Result<FileName> {
    FileName::parse(raw).ok_or_else(|| PageError::NotFound(raw.to_string()))
}
