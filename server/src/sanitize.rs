//! HTML sanitization for entry bodies.
//!
//! Allowlist matching the site's policy: the usual formatting/structure tags
//! plus `img`, with attributes limited to `href`, `src`, `alt`, `title` and
//! `target` on any allowed tag. Everything else — `script`/`style` with their
//! content, event handlers, unknown tags — is stripped before persistence.

use ammonia::Builder;

/// Formatting and structure tags entries may contain, plus `img`.
const ALLOWED_TAGS: &[&str] = &[
    "a", "abbr", "b", "blockquote", "br", "caption", "cite", "code", "col", "colgroup", "dd",
    "dfn", "div", "dl", "dt", "em", "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "i", "img", "kbd", "li", "mark", "ol", "p", "pre", "q", "s", "samp", "small", "span",
    "strike", "strong", "sub", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "u",
    "ul",
];

const ALLOWED_ATTRIBUTES: &[&str] = &["href", "src", "alt", "title", "target"];

/// Reduce untrusted HTML to the allowed subset.
pub fn sanitize_body(html: &str) -> String {
    Builder::default()
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .generic_attributes(ALLOWED_ATTRIBUTES.iter().copied().collect())
        .clean(html)
        .to_string()
}

/// Whether a sanitized body still carries any content worth storing.
pub fn is_blank(html: &str) -> bool {
    html.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tags_are_removed_with_content() {
        let clean = sanitize_body("<p>hi</p><script>alert(1)</script>");
        assert_eq!(clean, "<p>hi</p>");
    }

    #[test]
    fn formatting_and_images_survive() {
        let clean = sanitize_body(
            r#"<h2>T</h2><p><strong>bold</strong></p><img src="/api/images/x" alt="pic">"#,
        );
        assert!(clean.contains("<h2>"));
        assert!(clean.contains("<strong>bold</strong>"));
        assert!(clean.contains(r#"src="/api/images/x""#));
        assert!(clean.contains(r#"alt="pic""#));
    }

    #[test]
    fn event_handlers_and_unknown_tags_are_stripped() {
        let clean = sanitize_body(r#"<p onclick="x()">hi</p><iframe src="http://evil"></iframe>"#);
        assert!(!clean.contains("onclick"));
        assert!(!clean.contains("iframe"));
        assert!(clean.contains("<p>hi</p>"));
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(sanitize_body("just text"), "just text");
    }

    #[test]
    fn script_only_body_becomes_blank() {
        assert!(is_blank(&sanitize_body("<script>alert(1)</script>")));
        assert!(is_blank("  \n "));
        assert!(!is_blank("<p>hello</p>"));
    }
}
