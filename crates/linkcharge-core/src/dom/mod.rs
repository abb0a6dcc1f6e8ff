//! DOM access and structural change notification.
//!
//! The host owns the element tree. The engine reads and writes attributes
//! through [`DomTree`] and subscribes to child-list changes through
//! [`MutationHost`]; how the host produces mutation batches (native observer,
//! polling, virtual-DOM diff) is its own business.

mod memory;
mod selector;

pub use memory::MemoryDom;
pub use selector::Selector;

use serde::{Deserialize, Serialize};

/// Handle of an element or text node in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Handle of a registered mutation observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObserverId(pub u64);

/// What an observer wants to hear about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserveOptions {
    /// Child insertions and removals.
    pub child_list: bool,
    /// Changes anywhere below the target, not only its direct children.
    pub subtree: bool,
    /// Attribute writes.
    pub attributes: bool,
}

impl ObserveOptions {
    /// Child-list changes over the whole subtree, attributes excluded so the
    /// engine's own writes never come back as mutations.
    pub const STRUCTURAL: Self = Self {
        child_list: true,
        subtree: true,
        attributes: false,
    };
}

/// Kind of a recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// Children were added or removed.
    ChildList,
    /// An attribute was written or removed.
    Attributes {
        /// Attribute name.
        name: String,
    },
}

/// One recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Kind of change.
    pub kind: MutationKind,
    /// Node whose children or attributes changed.
    pub target: NodeId,
    /// Nodes inserted under `target`.
    pub added_nodes: Vec<NodeId>,
    /// Nodes removed from `target`.
    pub removed_nodes: Vec<NodeId>,
}

impl MutationRecord {
    /// A child-list change.
    pub fn child_list(
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
    ) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added_nodes,
            removed_nodes,
        }
    }

    /// An attribute change.
    pub fn attribute(target: NodeId, name: impl Into<String>) -> Self {
        Self {
            kind: MutationKind::Attributes { name: name.into() },
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
        }
    }

    /// Whether this is a child-list change.
    pub fn is_child_list(&self) -> bool {
        matches!(self.kind, MutationKind::ChildList)
    }
}

/// Read/write access to the host element tree.
///
/// Every method tolerates stale handles: reads return nothing and writes are
/// ignored.
pub trait DomTree {
    /// Lowercase tag name; `None` for text nodes and unknown handles.
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Value of an attribute.
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Names of all attributes currently on the node.
    fn attribute_names(&self, node: NodeId) -> Vec<String>;

    /// Set an attribute, replacing any previous value.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Remove an attribute if present.
    fn remove_attribute(&mut self, node: NodeId, name: &str);

    /// Parent node, if attached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self, node: NodeId) -> String;

    /// Whether the `class` attribute lists `class`.
    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Descendants of `root` (excluding `root`) matching `selector`, in
    /// document order.
    fn query_all(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if selector.matches(self, node) {
                found.push(node);
            }
            stack.extend(self.children(node).into_iter().rev());
        }
        found
    }

    /// Like [`DomTree::query_all`] but `root` itself is a candidate too.
    fn query_subtree(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut found = Vec::new();
        if selector.matches(self, root) {
            found.push(root);
        }
        found.extend(self.query_all(root, selector));
        found
    }
}

/// Subscription to child-list changes.
pub trait MutationHost {
    /// Start observing `target`. The host delivers batches for the returned
    /// observer to [`crate::LinkCoordinator::on_mutations`].
    fn observe(&mut self, target: NodeId, options: ObserveOptions) -> ObserverId;

    /// Stop an observer. Unknown or already disconnected observers are ignored.
    fn disconnect(&mut self, observer: ObserverId);
}
