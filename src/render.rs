//! Public page serving
//!
//! Stored bytes go back exactly as written. Nothing is interpreted, so a
//! `.php` page is served as HTML text.

use bytes::Bytes;
use mime::Mime;

use crate::pages::{FileName, PageError, PageStore, Result};

/// A stored page ready to send
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub content_type: Mime,
    pub body: Bytes,
}

/// Content type by extension: `.js` and `.css` get their own types,
/// everything else is HTML.
pub fn content_type_for(name: &FileName) -> Mime {
    match name.extension().as_deref() {
        Some("js") => mime::APPLICATION_JAVASCRIPT_UTF_8,
        Some("css") => mime::TEXT_CSS_UTF_8,
        _ => mime::TEXT_HTML_UTF_8,
    }
}

/// Look `raw` up verbatim in the store
///
/// The name is not sanitized; it only has to be a plain entry name. Unsafe
/// names are reported as `NotFound` like absent ones.
pub async fn render(store: &PageStore, raw: &str) -> Result<RenderedPage> {
    let name = FileName::parse(raw).ok_or_else(|| PageError::NotFound(raw.to_string()))?;
    let body = store.read(&name).await?;

    Ok(RenderedPage {
        content_type: content_type_for(&name),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn name(raw: &str) -> FileName {
        FileName::parse(raw).unwrap()
    }

    #[test]
    fn test_content_types() {
        assert_eq!(
            content_type_for(&name("app.js")).essence_str(),
            "application/javascript"
        );
        assert_eq!(content_type_for(&name("site.css")).essence_str(), "text/css");
        assert_eq!(content_type_for(&name("page.html")).essence_str(), "text/html");
        assert_eq!(content_type_for(&name("page.php")).essence_str(), "text/html");
        assert_eq!(content_type_for(&name("APP.JS")).essence_str(), "application/javascript");
        assert_eq!(content_type_for(&name("noext")).essence_str(), "text/html");
    }

    #[tokio::test]
    async fn test_render_existing_and_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = PageStore::new(temp_dir.path());
        store.write(&name("page.js"), b"console.log(1)").await.unwrap();

        let page = render(&store, "page.js").await.unwrap();
        assert_eq!(page.content_type, mime::APPLICATION_JAVASCRIPT_UTF_8);
        assert_eq!(&page.body[..], b"console.log(1)");

        assert!(matches!(
            render(&store, "unknown.html").await,
            Err(PageError::NotFound(_))
        ));
        assert!(matches!(
            render(&store, "../page.js").await,
            Err(PageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_php_is_served_as_text() {
        let temp_dir = TempDir::new().unwrap();
        let store = PageStore::new(temp_dir.path());
        store.write(&name("x.php"), b"<?php echo 1; ?>").await.unwrap();

        let page = render(&store, "x.php").await.unwrap();
        assert_eq!(page.content_type, mime::TEXT_HTML_UTF_8);
        assert_eq!(&page.body[..], b"<?php echo 1; ?>");
    }
}
