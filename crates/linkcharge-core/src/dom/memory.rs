//! In-memory element tree with mutation recording.
//!
//! A small arena-backed DOM that implements every host trait the coordinator
//! needs. Used by tests and by hosts that render panels themselves.

use super::{
    DomTree, MutationHost, MutationKind, MutationRecord, NodeId, ObserveOptions, ObserverId,
};
use crate::host::PanelRegistry;
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Observation {
    target: NodeId,
    options: ObserveOptions,
    records: Vec<MutationRecord>,
}

/// Arena-backed DOM with observers and a panel registry.
#[derive(Debug, Default)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    observers: BTreeMap<ObserverId, Observation>,
    next_observer: u64,
    panels: BTreeMap<String, Vec<NodeId>>,
}

impl MemoryDom {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element. Detached nodes produce no mutation records.
    pub fn create_element(&mut self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        self.push_node(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: attributes
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_string()))
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        let node = self.create_element(tag, attributes);
        self.append_child(parent, node);
        node
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Move `child` under `parent` as its last child.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none()
            || self.node(child).is_none()
            || self.contains(child, parent)
        {
            return;
        }
        if let Some(old_parent) = self.node(child).and_then(|n| n.parent) {
            self.remove_child(old_parent, child);
        }
        if let Some(data) = self.node_mut(child) {
            data.parent = Some(parent);
        }
        if let Some(data) = self.node_mut(parent) {
            data.children.push(child);
        }
        self.record(MutationRecord::child_list(parent, vec![child], Vec::new()));
    }

    /// Detach `child` from `parent`. Returns whether it was a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(data) = self.node_mut(parent) else {
            return false;
        };
        let before = data.children.len();
        data.children.retain(|c| *c != child);
        if data.children.len() == before {
            return false;
        }
        if let Some(data) = self.node_mut(child) {
            data.parent = None;
        }
        self.record(MutationRecord::child_list(parent, Vec::new(), vec![child]));
        true
    }

    /// Detach every child of `parent` in one mutation record.
    pub fn clear_children(&mut self, parent: NodeId) {
        let Some(data) = self.node_mut(parent) else {
            return;
        };
        let removed = std::mem::take(&mut data.children);
        if removed.is_empty() {
            return;
        }
        for child in &removed {
            if let Some(data) = self.node_mut(*child) {
                data.parent = None;
            }
        }
        self.record(MutationRecord::child_list(parent, Vec::new(), removed));
    }

    /// Register an open panel of `panel_type` rooted at `container`.
    pub fn open_panel(&mut self, panel_type: &str, container: NodeId) {
        self.panels
            .entry(panel_type.to_string())
            .or_default()
            .push(container);
    }

    /// Forget an open panel.
    pub fn close_panel(&mut self, panel_type: &str, container: NodeId) {
        if let Some(containers) = self.panels.get_mut(panel_type) {
            containers.retain(|c| *c != container);
        }
    }

    /// Take the pending records of one observer.
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .get_mut(&observer)
            .map(|o| std::mem::take(&mut o.records))
            .unwrap_or_default()
    }

    /// Take every pending batch, one per observer that has records.
    pub fn drain_records(&mut self) -> Vec<(ObserverId, Vec<MutationRecord>)> {
        self.observers
            .iter_mut()
            .filter(|(_, o)| !o.records.is_empty())
            .map(|(id, o)| (*id, std::mem::take(&mut o.records)))
            .collect()
    }

    /// Number of connected observers.
    pub fn active_observers(&self) -> usize {
        self.observers.len()
    }

    /// Whether `observer` is still connected.
    pub fn is_observing(&self, observer: ObserverId) -> bool {
        self.observers.contains_key(&observer)
    }

    /// Snapshot of a node's attributes in insertion order.
    pub fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        match self.node(node).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes.clone(),
            _ => Vec::new(),
        }
    }

    /// Every node id ever created, attached or not.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|index| NodeId(index as u32))
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn record(&mut self, record: MutationRecord) {
        let interested: Vec<ObserverId> = self
            .observers
            .iter()
            .filter(|(_, o)| {
                let wanted = match record.kind {
                    MutationKind::ChildList => o.options.child_list,
                    MutationKind::Attributes { .. } => o.options.attributes,
                };
                let in_scope = record.target == o.target
                    || (o.options.subtree && self.contains(o.target, record.target));
                wanted && in_scope
            })
            .map(|(id, _)| *id)
            .collect();

        for id in interested {
            if let Some(observation) = self.observers.get_mut(&id) {
                observation.records.push(record.clone());
            }
        }
    }
}

impl DomTree for MemoryDom {
    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    fn attribute_names(&self, node: NodeId) -> Vec<String> {
        self.attributes(node).into_iter().map(|(name, _)| name).collect()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(NodeKind::Element { attributes, .. }) = self.node_mut(node).map(|n| &mut n.kind)
        else {
            return;
        };
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
        self.record(MutationRecord::attribute(node, name));
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let Some(NodeKind::Element { attributes, .. }) = self.node_mut(node).map(|n| &mut n.kind)
        else {
            return;
        };
        let before = attributes.len();
        attributes.retain(|(n, _)| n != name);
        if attributes.len() != before {
            self.record(MutationRecord::attribute(node, name));
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut text = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(data) = self.node(id) else {
                continue;
            };
            if let NodeKind::Text(t) = &data.kind {
                text.push_str(t);
            }
            stack.extend(data.children.iter().rev().copied());
        }
        text
    }
}

impl MutationHost for MemoryDom {
    fn observe(&mut self, target: NodeId, options: ObserveOptions) -> ObserverId {
        self.next_observer += 1;
        let id = ObserverId(self.next_observer);
        self.observers.insert(
            id,
            Observation {
                target,
                options,
                records: Vec::new(),
            },
        );
        trace!("Observing {:?} as {:?}", target, id);
        id
    }

    fn disconnect(&mut self, observer: ObserverId) {
        if self.observers.remove(&observer).is_some() {
            trace!("Disconnected {:?}", observer);
        }
    }
}

impl PanelRegistry for MemoryDom {
    fn open_panels(&self, panel_type: &str) -> Vec<NodeId> {
        self.panels.get(panel_type).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_is_document_order() {
        let mut dom = MemoryDom::new();
        let root = dom.create_element("div", &[]);
        let span = dom.append_element(root, "span", &[]);
        dom.append_text(span, "Hello ");
        dom.append_text(root, "World");
        assert_eq!(dom.text_content(root), "Hello World");
    }

    #[test]
    fn test_structural_observer_sees_subtree_inserts_only() {
        let mut dom = MemoryDom::new();
        let root = dom.create_element("div", &[]);
        let inner = dom.append_element(root, "div", &[]);
        let observer = dom.observe(root, ObserveOptions::STRUCTURAL);

        let item = dom.append_element(inner, "div", &[("class", "tree-item")]);
        dom.set_attribute(item, "data-link-status", "active");

        let records = dom.take_records(observer);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].target, inner);
        assert_eq!(records[0].added_nodes, vec![item]);
        assert!(dom.take_records(observer).is_empty());
    }

    #[test]
    fn test_attribute_observer_records_writes() {
        let mut dom = MemoryDom::new();
        let root = dom.create_element("div", &[]);
        let observer = dom.observe(
            root,
            ObserveOptions {
                child_list: false,
                subtree: false,
                attributes: true,
            },
        );
        dom.set_attribute(root, "class", "x");
        dom.remove_attribute(root, "missing");
        assert_eq!(dom.take_records(observer).len(), 1);
    }

    #[test]
    fn test_append_moves_node_and_rejects_cycles() {
        let mut dom = MemoryDom::new();
        let a = dom.create_element("div", &[]);
        let b = dom.create_element("div", &[]);
        let child = dom.append_element(a, "span", &[]);

        dom.append_child(b, child);
        assert!(dom.children(a).is_empty());
        assert_eq!(dom.parent(child), Some(b));

        dom.append_child(child, b);
        assert_eq!(dom.parent(b), None);
    }

    #[test]
    fn test_disconnect_stops_recording() {
        let mut dom = MemoryDom::new();
        let root = dom.create_element("div", &[]);
        let observer = dom.observe(root, ObserveOptions::STRUCTURAL);
        dom.disconnect(observer);
        dom.append_element(root, "span", &[]);
        assert_eq!(dom.active_observers(), 0);
        assert!(dom.drain_records().is_empty());
    }
}
