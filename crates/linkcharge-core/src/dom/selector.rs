//! Compound simple selectors.
//!
//! Panels identify their link elements with selectors such as
//! `.tree-item-inner` or `a.internal-link`. Only that compound form is
//! supported: an optional tag (or `*`) followed by any number of `.class`
//! parts. Combinators, ids and attribute selectors are rejected.

use super::{DomTree, NodeId};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    tag: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse a selector.
    pub fn parse(source: &str) -> Result<Self> {
        let trimmed = source.trim();
        let invalid = |reason: &str| Error::Selector {
            selector: source.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("selector is empty"));
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '*')))
        {
            return Err(invalid(&format!("unsupported character '{c}'")));
        }

        let mut parts = trimmed.split('.');
        let tag = match parts.next() {
            Some("") | Some("*") | None => None,
            Some(tag) if tag.contains('*') => return Err(invalid("'*' must stand alone")),
            Some(tag) => Some(tag.to_ascii_lowercase()),
        };

        let mut classes = Vec::new();
        for class in parts {
            if class.is_empty() {
                return Err(invalid("empty class name"));
            }
            if class.contains('*') {
                return Err(invalid("'*' is not a class name"));
            }
            classes.push(class.to_string());
        }

        Ok(Self {
            source: trimmed.to_string(),
            tag,
            classes,
        })
    }

    /// The selector as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Required tag, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Required classes.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether `node` matches.
    pub fn matches<D: DomTree + ?Sized>(&self, dom: &D, node: NodeId) -> bool {
        let Some(tag) = dom.tag_name(node) else {
            return false;
        };
        if let Some(expected) = &self.tag {
            if !tag.eq_ignore_ascii_case(expected) {
                return false;
            }
        }
        self.classes.iter().all(|class| dom.has_class(node, class))
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn test_parse_supported_forms() {
        let s = Selector::parse(".tree-item-inner").unwrap();
        assert_eq!(s.tag, None);
        assert_eq!(s.classes, vec!["tree-item-inner"]);

        let s = Selector::parse("a.internal-link").unwrap();
        assert_eq!(s.tag.as_deref(), Some("a"));

        let s = Selector::parse("*").unwrap();
        assert!(s.tag.is_none() && s.classes.is_empty());
    }

    #[test]
    fn test_parse_rejects_combinators() {
        assert!(Selector::parse("div > a").is_err());
        assert!(Selector::parse("#id").is_err());
        assert!(Selector::parse("a..b").is_err());
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("a*").is_err());
    }

    #[test]
    fn test_matches() {
        let mut dom = MemoryDom::new();
        let link = dom.create_element("a", &[("class", "internal-link extra")]);
        let div = dom.create_element("div", &[("class", "internal-link")]);
        let text = dom.create_text("x");

        let selector = Selector::parse("a.internal-link").unwrap();
        assert!(selector.matches(&dom, link));
        assert!(!selector.matches(&dom, div));
        assert!(!selector.matches(&dom, text));

        let selector = Selector::parse(".internal-link").unwrap();
        assert!(selector.matches(&dom, div));
    }
}
