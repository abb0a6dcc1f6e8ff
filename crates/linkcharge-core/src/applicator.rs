//! Writing resolved attributes onto elements.
//!
//! Only attributes carrying the `data-link-` prefix are ever written or
//! removed, so anything the host put on an element is left alone.

use crate::attributes::{is_data_link_attribute, AttributeSet};
use crate::dom::{DomTree, NodeId};

/// Make the element's `data-link-*` attributes equal `attributes`.
///
/// Prefixed attributes left over from an earlier application and absent
/// from `attributes` are removed; unchanged values are not rewritten.
/// Returns whether anything changed.
pub fn apply<D: DomTree + ?Sized>(dom: &mut D, element: NodeId, attributes: &AttributeSet) -> bool {
    let wanted = attributes.to_dom();
    let mut changed = false;

    for name in dom.attribute_names(element) {
        if is_data_link_attribute(&name) && !wanted.contains_key(&name) {
            dom.remove_attribute(element, &name);
            changed = true;
        }
    }

    for (name, value) in &wanted {
        if dom.attribute(element, name) != Some(value.as_str()) {
            dom.set_attribute(element, name, value);
            changed = true;
        }
    }

    changed
}

/// Remove every `data-link-*` attribute from the element.
///
/// Returns whether anything was removed.
pub fn clear<D: DomTree + ?Sized>(dom: &mut D, element: NodeId) -> bool {
    let mut changed = false;
    for name in dom.attribute_names(element) {
        if is_data_link_attribute(&name) {
            dom.remove_attribute(element, &name);
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    fn set(pairs: &[(&str, &str)]) -> AttributeSet {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_apply_keeps_unrelated_attributes() {
        let mut dom = MemoryDom::new();
        let el = dom.create_element("a", &[("class", "internal-link"), ("href", "B")]);

        assert!(apply(&mut dom, el, &set(&[("status", "active")])));
        assert_eq!(dom.attribute(el, "class"), Some("internal-link"));
        assert_eq!(dom.attribute(el, "href"), Some("B"));
        assert_eq!(dom.attribute(el, "data-link-status"), Some("active"));
    }

    #[test]
    fn test_apply_removes_stale_keys() {
        let mut dom = MemoryDom::new();
        let el = dom.create_element("a", &[]);

        apply(&mut dom, el, &set(&[("status", "active"), ("type", "project")]));
        apply(&mut dom, el, &set(&[("status", "done")]));

        assert_eq!(dom.attribute(el, "data-link-status"), Some("done"));
        assert_eq!(dom.attribute(el, "data-link-type"), None);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut dom = MemoryDom::new();
        let el = dom.create_element("a", &[("id", "x")]);
        let attributes = set(&[("status", "active")]);

        apply(&mut dom, el, &attributes);
        let once = dom.attributes(el);
        assert!(!apply(&mut dom, el, &attributes));
        assert_eq!(dom.attributes(el), once);
    }

    #[test]
    fn test_apply_then_clear_restores_original() {
        let mut dom = MemoryDom::new();
        let el = dom.create_element("div", &[("class", "tree-item-inner"), ("data-path", "B.md")]);
        let before = dom.attributes(el);

        apply(&mut dom, el, &set(&[("status", "active"), ("tags", "a b")]));
        assert!(clear(&mut dom, el));
        assert_eq!(dom.attributes(el), before);
        assert!(!clear(&mut dom, el));
        assert_eq!(dom.attributes(el), before);
    }

    #[test]
    fn test_apply_empty_set_clears() {
        let mut dom = MemoryDom::new();
        let el = dom.create_element("a", &[]);
        apply(&mut dom, el, &set(&[("status", "active")]));
        assert!(apply(&mut dom, el, &AttributeSet::new()));
        assert!(dom.attributes(el).is_empty());
    }
}
