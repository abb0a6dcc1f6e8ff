//! Property tests for resolution and application.

use linkcharge_core::test_support::MockMetadataSource;
use linkcharge_core::{applicator, AttributeResolver, AttributeSet, MemoryDom, RuleSet, Settings};
use proptest::prelude::*;
use serde_json::json;

fn rules() -> RuleSet {
    RuleSet::compile(&Settings {
        target_attributes: vec!["status".into(), "tags".into()],
        include_path: true,
        ..Settings::default()
    })
    .0
}

proptest! {
    #[test]
    fn resolution_is_total(link in "\\PC{0,40}", source_path in "[a-z/]{0,12}") {
        let source = MockMetadataSource::new()
            .with_note("B.md", json!({"status": "active", "tags": ["x"]}));
        let rules = rules();
        let resolver = AttributeResolver::new(&source, &rules);

        let attributes = resolver.resolve_link(&link, &source_path);
        if resolver.resolve_target(&link, &source_path).is_none() {
            prop_assert!(attributes.is_empty());
        }
    }

    #[test]
    fn apply_is_idempotent_and_clear_restores(
        existing in prop::collection::vec(("[a-z]{1,6}", "[a-z0-9 ]{0,6}"), 0..4),
        applied in prop::collection::vec(("[a-z][a-z0-9_-]{0,6}", "[a-z0-9 ]{0,6}"), 0..5),
    ) {
        let mut dom = MemoryDom::new();
        let pairs: Vec<(&str, &str)> =
            existing.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let element = dom.create_element("span", &pairs);
        let before = dom.attributes(element);

        let set: AttributeSet = applied.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        applicator::apply(&mut dom, element, &set);
        let once = dom.attributes(element);
        prop_assert!(!applicator::apply(&mut dom, element, &set));
        prop_assert_eq!(&once, &dom.attributes(element));

        applicator::clear(&mut dom, element);
        prop_assert_eq!(before, dom.attributes(element));
        prop_assert!(!applicator::clear(&mut dom, element));
    }
}
