//! Display-time text processing.
//!
//! | Mode       | Output                                                   |
//! |------------|----------------------------------------------------------|
//! | `full`     | value as stored                                          |
//! | `plain`    | HTML-escaped, URLs and e-mails linked, newlines → `<br />` |
//! | `filtered` | tags outside [`ALLOWED_TAGS`] removed, linked, `<br />`   |
//! | `markdown` | CommonMark rendered to HTML, raw HTML escaped            |

use std::fmt;
use std::sync::OnceLock;

use pulldown_cmark::{Event, Options, Parser};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Tags kept by the `filtered` mode.
pub const ALLOWED_TAGS: &[&str] = &[
    "a", "em", "strong", "b", "i", "u", "cite", "blockquote", "code", "pre", "ul", "ol", "li",
    "dl", "dt", "dd", "p", "br",
];

/// How a text value is transformed before it is displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// No transformation.
    #[default]
    Full,
    /// Escaped plain text.
    Plain,
    /// Limited HTML.
    Filtered,
    /// Markdown.
    Markdown,
}

impl ProcessingMode {
    /// Returns the settings name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Plain => "plain",
            Self::Filtered => "filtered",
            Self::Markdown => "markdown",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transforms `text` for display.
pub fn process(text: &str, mode: ProcessingMode) -> String {
    match mode {
        ProcessingMode::Full => text.to_string(),
        ProcessingMode::Plain => nl2br(&linkify(&html_escape::encode_text(text))),
        ProcessingMode::Filtered => nl2br(&linkify(&filter_tags(text))),
        ProcessingMode::Markdown => markdown(text),
    }
}

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static HREF_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| {
        Regex::new(r"<(?P<close>/)?(?P<name>[A-Za-z][A-Za-z0-9]*)\b(?P<attrs>[^>]*)>")
            .expect("Invalid tag regex")
    })
}

fn link_regex() -> &'static Regex {
    LINK_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?P<url>(?:https?|ftp)://[^\s<>"']*[^\s<>"'.,;:!?)])|(?P<email>[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+)"#,
        )
        .expect("Invalid link regex")
    })
}

fn href_regex() -> &'static Regex {
    HREF_REGEX.get_or_init(|| {
        Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid href regex")
    })
}

/// Drops tags outside [`ALLOWED_TAGS`] and every attribute except a safe
/// `href` on anchors. Text content is kept.
fn filter_tags(html: &str) -> String {
    tag_regex()
        .replace_all(html, |caps: &Captures<'_>| {
            let name = caps["name"].to_ascii_lowercase();
            if !ALLOWED_TAGS.contains(&name.as_str()) {
                return String::new();
            }
            if caps.name("close").is_some() {
                return format!("</{name}>");
            }

            let href = (name == "a")
                .then(|| href_regex().captures(&caps["attrs"]))
                .flatten()
                .and_then(|h| h.get(1).or_else(|| h.get(2)))
                .map(|m| m.as_str())
                .filter(|url| is_safe_url(url));

            match href {
                Some(url) => format!("<a href=\"{}\">", html_escape::encode_double_quoted_attribute(url)),
                None => format!("<{name}>"),
            }
        })
        .into_owned()
}

/// Schemes an anchor may link to. Relative URLs carry no scheme and are kept.
const SAFE_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto"];

fn is_safe_url(url: &str) -> bool {
    // Browsers drop whitespace and control characters before reading the scheme.
    let compact: String = url
        .chars()
        .filter(|c| !(c.is_ascii_control() || c.is_whitespace()))
        .collect();

    let scheme_end = compact.find(|c| matches!(c, ':' | '/' | '?' | '#'));
    match scheme_end {
        Some(end) if compact[end..].starts_with(':') => {
            let scheme = compact[..end].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

/// Turns bare URLs and e-mail addresses into links. Text inside existing
/// anchors and inside tags is left alone.
fn linkify(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    let mut anchor_depth = 0usize;

    for tag in tag_regex().captures_iter(html) {
        let Some(whole) = tag.get(0) else { continue };
        let text = &html[cursor..whole.start()];
        if anchor_depth == 0 {
            out.push_str(&link_text(text));
        } else {
            out.push_str(text);
        }
        out.push_str(whole.as_str());

        if tag["name"].eq_ignore_ascii_case("a") {
            if tag.name("close").is_some() {
                anchor_depth = anchor_depth.saturating_sub(1);
            } else {
                anchor_depth += 1;
            }
        }
        cursor = whole.end();
    }

    let rest = &html[cursor..];
    if anchor_depth == 0 {
        out.push_str(&link_text(rest));
    } else {
        out.push_str(rest);
    }
    out
}

fn link_text(text: &str) -> String {
    link_regex()
        .replace_all(text, |caps: &Captures<'_>| {
            if let Some(url) = caps.name("url") {
                format!("<a href=\"{0}\">{0}</a>", url.as_str())
            } else {
                let email = &caps["email"];
                format!("<a href=\"mailto:{email}\">{email}</a>")
            }
        })
        .into_owned()
}

/// Inserts `<br />` before every line break.
fn nl2br(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                out.push_str("<br />\r\n");
            }
            '\r' | '\n' => {
                out.push_str("<br />");
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn markdown(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    // Raw HTML in the source is shown as text, never passed through.
    let parser = Parser::new_ext(text, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut html = String::with_capacity(text.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_is_identity() {
        let text = "<b>bold</b>\nhttp://example.com";
        assert_eq!(process(text, ProcessingMode::Full), text);
    }

    #[test]
    fn test_plain_escapes_links_and_breaks() {
        let out = process(
            "<script>x</script>\nsee http://example.com/a?b=1.",
            ProcessingMode::Plain,
        );
        assert_eq!(
            out,
            "&lt;script&gt;x&lt;/script&gt;<br />\nsee <a href=\"http://example.com/a?b=1\">http://example.com/a?b=1</a>."
        );
    }

    #[test]
    fn test_plain_links_email() {
        assert_eq!(
            process("mail me@example.org", ProcessingMode::Plain),
            "mail <a href=\"mailto:me@example.org\">me@example.org</a>"
        );
    }

    #[test]
    fn test_filtered_keeps_allowed_tags_only() {
        let out = process(
            "<p onclick=\"x()\">Hi <strong>there</strong><img src=\"a.png\"><script>bad()</script></p>",
            ProcessingMode::Filtered,
        );
        assert_eq!(out, "<p>Hi <strong>there</strong>bad()</p>");
    }

    #[test]
    fn test_filtered_keeps_safe_anchor_href() {
        let out = process(
            "<a href=\"https://x.io\" target=\"_blank\">x</a> <a href=\"javascript:alert(1)\">y</a>",
            ProcessingMode::Filtered,
        );
        assert_eq!(out, "<a href=\"https://x.io\">x</a> <a>y</a>");
    }

    #[test]
    fn test_filtered_drops_obfuscated_script_hrefs() {
        for href in [
            "java\tscript:alert(1)",
            "java\nscript:alert(1)",
            "\u{1}javascript:alert(1)",
            " JavaScript:alert(1)",
            "vbscript:msgbox(1)",
            "data:text/html;base64,PHNjcmlwdD4=",
        ] {
            let out = process(&format!("<a href=\"{href}\">x</a>"), ProcessingMode::Filtered);
            assert_eq!(out, "<a>x</a>", "{href:?}");
        }
    }

    #[test]
    fn test_safe_url_schemes() {
        assert!(is_safe_url("https://example.com"));
        assert!(is_safe_url("MAILTO:me@example.org"));
        assert!(is_safe_url("/docs/page?a=b:c"));
        assert!(is_safe_url("page#top"));
        assert!(!is_safe_url("file:///etc/passwd"));
    }

    #[test]
    fn test_filtered_does_not_relink_anchor_text() {
        let out = process(
            "<a href=\"http://a.io\">http://a.io</a>\nhttp://b.io",
            ProcessingMode::Filtered,
        );
        assert_eq!(
            out,
            "<a href=\"http://a.io\">http://a.io</a><br />\n<a href=\"http://b.io\">http://b.io</a>"
        );
    }

    #[test]
    fn test_markdown() {
        let out = process("# Title\n\nSome *text*.", ProcessingMode::Markdown);
        assert_eq!(out, "<h1>Title</h1>\n<p>Some <em>text</em>.</p>\n");
    }

    #[test]
    fn test_markdown_escapes_raw_html() {
        let out = process(
            "Hi <script>alert(1)</script>\n\n<div onclick=\"x()\">block</div>",
            ProcessingMode::Markdown,
        );
        assert!(!out.contains("<script>"), "{out}");
        assert!(!out.contains("<div"), "{out}");
        assert!(out.contains("&lt;script&gt;"), "{out}");
    }

    #[test]
    fn test_nl2br_handles_crlf() {
        assert_eq!(nl2br("a\r\nb\nc"), "a<br />\r\nb<br />\nc");
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(ProcessingMode::Filtered.to_string(), "filtered");
        let mode: ProcessingMode = serde_json::from_str("\"markdown\"").expect("mode");
        assert_eq!(mode, ProcessingMode::Markdown);
    }
}
