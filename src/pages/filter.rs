//! HTML allowlist applied to page bodies before they are written.
//!
//! The base set is ammonia's defaults (formatting, lists, tables, links,
//! images). On top of that pages may use layout containers, the common
//! global attributes, and `meta` so a page can carry a charset or a
//! refresh redirect. Script, style and event-handler attributes never
//! survive.

use ammonia::Builder;

const LAYOUT_TAGS: &[&str] = &[
    "article", "aside", "center", "details", "div", "figcaption", "figure", "footer",
    "header", "main", "nav", "section", "span", "summary",
];

const GENERIC_ATTRIBUTES: &[&str] = &["class", "id", "style", "title", "lang", "dir"];

const META_ATTRIBUTES: &[&str] = &["charset", "content", "http-equiv", "name"];

pub struct ContentFilter {
    builder: Builder<'static>,
}

impl ContentFilter {
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder
            .add_tags(LAYOUT_TAGS)
            .add_tags(["meta"])
            .add_generic_attributes(GENERIC_ATTRIBUTES)
            .add_tag_attributes("meta", META_ATTRIBUTES);
        Self { builder }
    }

    /// Strip everything outside the allowlist.
    pub fn clean(&self, input: &str) -> String {
        self.builder.clean(input).to_string()
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContentFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentFilter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_plain_markup() {
        let filter = ContentFilter::new();
        assert_eq!(filter.clean("<p>hi</p>"), "<p>hi</p>");
        assert_eq!(
            filter.clean("<h1>Title</h1><ul><li>one</li></ul>"),
            "<h1>Title</h1><ul><li>one</li></ul>"
        );
    }

    #[test]
    fn test_removes_scripts_and_handlers() {
        let filter = ContentFilter::new();

        let cleaned = filter.clean("<p onclick=\"evil()\">x</p><script>alert(1)</script>");
        assert!(!cleaned.contains("onclick"));
        assert!(!cleaned.contains("script"));
        assert!(!cleaned.contains("alert"));
        assert!(cleaned.contains("<p>x</p>"));
    }

    #[test]
    fn test_keeps_layout_and_generic_attributes() {
        let filter = ContentFilter::new();

        let cleaned = filter.clean("<div class=\"hero\" id=\"top\"><span>x</span></div>");
        assert!(cleaned.contains("class=\"hero\""));
        assert!(cleaned.contains("id=\"top\""));
        assert!(cleaned.contains("<span>x</span>"));
    }

    #[test]
    fn test_keeps_meta_refresh() {
        let filter = ContentFilter::new();

        let cleaned = filter.clean(
            "<meta http-equiv=\"refresh\" content=\"0; url=https://example.com/\"><p>Moved</p>",
        );
        assert!(cleaned.contains("<meta"));
        assert!(cleaned.contains("http-equiv=\"refresh\""));
        assert!(cleaned.contains("<p>Moved</p>"));
    }

    #[test]
    fn test_script_only_content_is_empty() {
        let filter = ContentFilter::new();
        assert_eq!(filter.clean("<script>alert(1)</script>"), "");
    }
}
