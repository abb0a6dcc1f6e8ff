//! Attribute resolution.
//!
//! Pure functions from (link target, metadata, rules) to an [`AttributeSet`].
//! Resolution is total: missing metadata, missing fields and unmatched rules
//! all produce fewer attributes, never an error.

use crate::attributes::AttributeSet;
use crate::host::{LinkTarget, MetadataSource};
use crate::link;
use crate::rules::RuleSet;
use tracing::trace;

/// Resolve the attributes of a (possibly unresolved) target.
pub fn resolve_attributes<M>(
    target: Option<&LinkTarget>,
    source: &M,
    rules: &RuleSet,
) -> AttributeSet
where
    M: MetadataSource + ?Sized,
{
    let mut attributes = AttributeSet::new();
    let Some(target) = target else {
        return attributes;
    };

    if let Some(metadata) = source.metadata(target) {
        for rule in rules.rules() {
            let Some((key, value)) = metadata.get(rule.field()) else {
                continue;
            };
            let field = rules.field_for(key, value);
            let Some(output) = rule.evaluate(&field, value) else {
                continue;
            };
            if rule.attribute() == "tags" {
                attributes.merge_tokens("tags", &strip_hashes(&output));
            } else {
                attributes.insert(rule.attribute(), output);
            }
        }

        if rules.target_tags() && !metadata.tags.is_empty() {
            attributes.merge_tokens("tags", &strip_hashes(&metadata.tags.join(" ")));
        }
    }

    if rules.include_path() {
        attributes.insert("path", target.path.clone());
    }

    trace!("Resolved {} attributes for {}", attributes.len(), target.path);
    attributes
}

fn strip_hashes(tokens: &str) -> String {
    tokens
        .split_whitespace()
        .map(|token| token.trim_start_matches('#'))
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A metadata source paired with the active rule set.
pub struct AttributeResolver<'a, M: ?Sized> {
    source: &'a M,
    rules: &'a RuleSet,
}

impl<'a, M: MetadataSource + ?Sized> AttributeResolver<'a, M> {
    /// Resolver over `source` using `rules`.
    pub fn new(source: &'a M, rules: &'a RuleSet) -> Self {
        Self { source, rules }
    }

    /// Resolve raw link text written in the note at `source_path`.
    ///
    /// The fragment and alias suffixes are stripped before lookup.
    pub fn resolve_target(&self, link_text: &str, source_path: &str) -> Option<LinkTarget> {
        let linkpath = link::link_path(link_text);
        if linkpath.is_empty() {
            return None;
        }
        self.source.resolve_link_target(linkpath, source_path)
    }

    /// Resolve raw link text all the way to attributes.
    pub fn resolve_link(&self, link_text: &str, source_path: &str) -> AttributeSet {
        let target = self.resolve_target(link_text, source_path);
        resolve_attributes(target.as_ref(), self.source, self.rules)
    }

    /// The active rule set.
    pub fn rules(&self) -> &RuleSet {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockMetadataSource;
    use linkcharge_config::{RuleConfig, Settings};
    use serde_json::json;

    fn rules(settings: Settings) -> RuleSet {
        RuleSet::compile(&settings).0
    }

    fn vault() -> MockMetadataSource {
        MockMetadataSource::new()
            .with_note("B.md", json!({"status": "active", "tags": ["#work", "urgent"]}))
            .with_note_tags("C.md", json!({"type": "person"}), &["friend"])
            .with_note("Empty.md", json!({}))
    }

    #[test]
    fn test_unresolved_target_is_empty() {
        let rules = rules(Settings {
            target_attributes: vec!["status".into()],
            include_path: true,
            ..Settings::default()
        });
        let source = vault();
        assert!(resolve_attributes(None, &source, &rules).is_empty());

        let resolver = AttributeResolver::new(&source, &rules);
        assert!(resolver.resolve_link("Nowhere", "A.md").is_empty());
        assert!(resolver.resolve_link("#heading-only", "A.md").is_empty());
    }

    #[test]
    fn test_resolve_strips_fragment() {
        let rules = rules(Settings {
            target_attributes: vec!["status".into()],
            ..Settings::default()
        });
        let source = vault();
        let resolver = AttributeResolver::new(&source, &rules);

        let attributes = resolver.resolve_link("B#section", "A.md");
        assert_eq!(attributes.get("status"), Some("active"));
        assert_eq!(attributes.len(), 1);
    }

    #[test]
    fn test_no_matching_metadata_is_empty() {
        let rules = rules(Settings {
            target_attributes: vec!["status".into()],
            ..Settings::default()
        });
        let source = vault();
        let resolver = AttributeResolver::new(&source, &rules);
        assert!(resolver.resolve_link("Empty", "A.md").is_empty());
    }

    #[test]
    fn test_tags_merge_from_field_and_inline() {
        let rules = rules(Settings {
            target_attributes: vec!["tags".into()],
            target_tags: true,
            ..Settings::default()
        });
        let source = vault();
        let resolver = AttributeResolver::new(&source, &rules);

        assert_eq!(resolver.resolve_link("B", "").get("tags"), Some("work urgent"));
        assert_eq!(resolver.resolve_link("C", "").get("tags"), Some("friend"));
    }

    #[test]
    fn test_later_rule_overwrites_same_attribute() {
        let rules = rules(Settings {
            rules: vec![
                RuleConfig::copy_field("status").with_attribute("kind"),
                RuleConfig::copy_field("type").with_attribute("kind"),
            ],
            ..Settings::default()
        });
        let source = MockMetadataSource::new()
            .with_note("D.md", json!({"status": "active", "type": "project"}));
        let resolver = AttributeResolver::new(&source, &rules);

        assert_eq!(resolver.resolve_link("D", "").get("kind"), Some("project"));
    }

    #[test]
    fn test_include_path() {
        let rules = rules(Settings {
            include_path: true,
            ..Settings::default()
        });
        let source = vault();
        let resolver = AttributeResolver::new(&source, &rules);
        assert_eq!(resolver.resolve_link("Empty", "").get("path"), Some("Empty.md"));
    }
}
