//! Slug sanitization
//!
//! A slug is the only user-controlled part of a stored file name, so the
//! output alphabet is closed: `[a-z0-9_-]`, never empty separators at
//! either end, never two separators in a row.

/// Normalize an arbitrary identifier into a file-name-safe slug.
///
/// ASCII letters are lowercased and digits kept. `-`, whitespace, `.`,
/// `/` and `\` act as a `-` separator, `_` as a `_` separator. Anything
/// else is dropped. A run of separators keeps only its first member.
///
/// The result may be empty; callers decide whether that is an error.
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending: Option<char> = None;

    for c in input.chars() {
        let separator = match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' => None,
            '_' => Some('_'),
            '-' | '.' | '/' | '\\' => Some('-'),
            c if c.is_whitespace() => Some('-'),
            _ => continue,
        };

        match separator {
            Some(sep) => {
                if !out.is_empty() && pending.is_none() {
                    pending = Some(sep);
                }
            }
            None => {
                if let Some(sep) = pending.take() {
                    out.push(sep);
                }
                out.push(c.to_ascii_lowercase());
            }
        }
    }

    out
}

/// Display title for a stored file: the name without its last extension.
pub fn title_from_filename(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(dot) => &name[..dot],
    }
}
