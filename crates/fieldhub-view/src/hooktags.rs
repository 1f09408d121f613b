//! Hooktags: WordPress-style short tags expanded at display time.
//!
//! ```text
//! [year]                        self-closing
//! [link url="/about"]About[/link]  enclosing
//! ```
//!
//! Unregistered tags are left verbatim.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use fieldhub_core::traits::ShortTagExpander;

/// Opening tag: name plus optional `key="value"` attributes.
static OPEN_TAG_REGEX: OnceLock<Regex> = OnceLock::new();

/// One attribute inside an opening tag.
static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();

fn open_tag_regex() -> &'static Regex {
    OPEN_TAG_REGEX.get_or_init(|| {
        Regex::new(
            r#"\[(?P<name>[A-Za-z][\w-]*)(?P<attrs>(?:\s+[\w-]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s\]"']+))*)\s*/?\]"#,
        )
        .expect("Invalid hooktag regex")
    })
}

fn attr_regex() -> &'static Regex {
    ATTR_REGEX.get_or_init(|| {
        Regex::new(r#"([\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"']+))"#)
            .expect("Invalid hooktag attribute regex")
    })
}

/// Attributes of one hooktag occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HooktagAttrs(IndexMap<String, String>);

impl HooktagAttrs {
    fn parse(raw: &str) -> Self {
        let attrs = attr_regex()
            .captures_iter(raw)
            .filter_map(|caps| {
                let key = caps.get(1)?.as_str().to_string();
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                Some((key, value))
            })
            .collect();
        Self(attrs)
    }

    /// Returns an attribute value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Renders one tag from its attributes and optional enclosed content.
pub type HooktagFn = Box<dyn Fn(&HooktagAttrs, Option<&str>) -> String + Send + Sync>;

/// Registry of hooktag renderers.
#[derive(Default)]
pub struct HooktagExpander {
    tags: IndexMap<String, HooktagFn>,
}

impl fmt::Debug for HooktagExpander {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HooktagExpander")
            .field("tags", &self.tags.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HooktagExpander {
    /// Creates an expander with no tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tag renderer, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, render: F) -> &mut Self
    where
        F: Fn(&HooktagAttrs, Option<&str>) -> String + Send + Sync + 'static,
    {
        self.tags.insert(name.to_string(), Box::new(render));
        self
    }

    /// Registered tag names.
    pub fn names(&self) -> Vec<&str> {
        self.tags.keys().map(String::as_str).collect()
    }
}

impl ShortTagExpander for HooktagExpander {
    fn expand(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        while let Some(caps) = open_tag_regex().captures_at(text, cursor) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
                break;
            };
            out.push_str(&text[cursor..whole.start()]);

            let Some(render) = self.tags.get(name.as_str()) else {
                out.push_str(whole.as_str());
                cursor = whole.end();
                continue;
            };

            let attrs = HooktagAttrs::parse(caps.name("attrs").map_or("", |m| m.as_str()));
            let closing = format!("[/{}]", name.as_str());
            let rest = &text[whole.end()..];
            let self_closing = whole.as_str().ends_with("/]");

            match rest.find(&closing).filter(|_| !self_closing) {
                Some(offset) => {
                    let content = self.expand(&rest[..offset]);
                    out.push_str(&render(&attrs, Some(&content)));
                    cursor = whole.end() + offset + closing.len();
                }
                None => {
                    out.push_str(&render(&attrs, None));
                    cursor = whole.end();
                }
            }
        }

        out.push_str(&text[cursor..]);
        out
    }
}
