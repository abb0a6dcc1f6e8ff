//! Panel synchronization.
//!
//! A [`PanelSynchronizer`] keeps the link elements of one panel instance in
//! step with the metadata of their targets while the host rewrites the
//! panel's DOM. Full mode re-scans the whole panel on every mutation batch;
//! dynamic mode only visits what was inserted.

use crate::applicator;
use crate::dom::{DomTree, MutationRecord, NodeId, Selector};
use crate::host::MetadataSource;
use crate::resolver::AttributeResolver;
use linkcharge_config::SyncMode;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Counters from one synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Link elements resolved and applied.
    pub visited: usize,
    /// Elements whose attributes actually changed.
    pub changed: usize,
}

impl SyncStats {
    fn record(&mut self, changed: bool) {
        self.visited += 1;
        if changed {
            self.changed += 1;
        }
    }

    /// Sum of two passes.
    pub fn merge(self, other: SyncStats) -> SyncStats {
        SyncStats {
            visited: self.visited + other.visited,
            changed: self.changed + other.changed,
        }
    }
}

/// Keeps one panel instance's link elements current.
#[derive(Debug, Clone)]
pub struct PanelSynchronizer {
    panel_type: String,
    container: NodeId,
    selector: Selector,
    mode: SyncMode,
}

impl PanelSynchronizer {
    /// Synchronizer for the panel rooted at `container`.
    pub fn new(
        panel_type: impl Into<String>,
        container: NodeId,
        selector: Selector,
        mode: SyncMode,
    ) -> Self {
        Self {
            panel_type: panel_type.into(),
            container,
            selector,
            mode,
        }
    }

    /// Panel type identifier.
    pub fn panel_type(&self) -> &str {
        &self.panel_type
    }

    /// Root element of the panel.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Selector of link elements.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Synchronization mode.
    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Resolve and apply every matching element in the panel.
    pub fn sync_all<D, M>(&self, dom: &mut D, resolver: &AttributeResolver<'_, M>) -> SyncStats
    where
        D: DomTree + ?Sized,
        M: MetadataSource + ?Sized,
    {
        let mut stats = SyncStats::default();
        for element in dom.query_all(self.container, &self.selector) {
            stats.record(update_element(dom, element, resolver));
        }
        debug!(
            "Synced {} panel: {} links, {} changed",
            self.panel_type, stats.visited, stats.changed
        );
        stats
    }

    /// React to a batch of mutations inside the panel.
    ///
    /// Attribute records are ignored. In full mode any child-list record
    /// triggers a full re-scan; in dynamic mode only link elements inside
    /// inserted subtrees (the inserted node included) and link elements whose
    /// own descendants changed are visited, each once per batch.
    pub fn handle_mutations<D, M>(
        &self,
        records: &[MutationRecord],
        dom: &mut D,
        resolver: &AttributeResolver<'_, M>,
    ) -> SyncStats
    where
        D: DomTree + ?Sized,
        M: MetadataSource + ?Sized,
    {
        let structural: Vec<&MutationRecord> =
            records.iter().filter(|r| r.is_child_list()).collect();
        if structural.is_empty() {
            return SyncStats::default();
        }

        match self.mode {
            SyncMode::Full => self.sync_all(dom, resolver),
            SyncMode::Dynamic => {
                let mut stats = SyncStats::default();
                let mut seen = HashSet::new();
                for record in structural {
                    // Children of an existing link element changed, so its text may have.
                    if let Some(owner) = self.enclosing_link(dom, record.target) {
                        if seen.insert(owner) {
                            stats.record(update_element(dom, owner, resolver));
                        }
                    }
                    for &inserted in &record.added_nodes {
                        if !dom.contains(self.container, inserted) {
                            trace!(
                                "Skipping {:?}, no longer in {} panel",
                                inserted,
                                self.panel_type
                            );
                            continue;
                        }
                        for element in dom.query_subtree(inserted, &self.selector) {
                            if seen.insert(element) {
                                stats.record(update_element(dom, element, resolver));
                            }
                        }
                    }
                }
                trace!(
                    "Dynamic sync of {} panel: {} inserted links",
                    self.panel_type,
                    stats.visited
                );
                stats
            }
        }
    }

    /// Closest link element at or above `node`, below the container.
    fn enclosing_link<D: DomTree + ?Sized>(&self, dom: &D, node: NodeId) -> Option<NodeId> {
        if !dom.contains(self.container, node) {
            return None;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.container {
                return None;
            }
            if self.selector.matches(dom, id) {
                return Some(id);
            }
            current = dom.parent(id);
        }
        None
    }

    /// Remove every `data-link-*` attribute from the panel's link elements.
    pub fn clear_all<D: DomTree + ?Sized>(&self, dom: &mut D) -> usize {
        clear_container(dom, self.container, &self.selector)
    }
}

/// Clear all matching elements under `container`. Returns how many changed.
pub fn clear_container<D: DomTree + ?Sized>(
    dom: &mut D,
    container: NodeId,
    selector: &Selector,
) -> usize {
    dom.query_all(container, selector)
        .into_iter()
        .filter(|element| applicator::clear(dom, *element))
        .count()
}

/// Link text of a panel element: `data-href`, else `href`, else its text.
pub fn link_text<D: DomTree + ?Sized>(dom: &D, element: NodeId) -> Option<String> {
    let text = dom
        .attribute(element, "data-href")
        .or_else(|| dom.attribute(element, "href"))
        .map(str::to_string)
        .unwrap_or_else(|| dom.text_content(element));
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn update_element<D, M>(dom: &mut D, element: NodeId, resolver: &AttributeResolver<'_, M>) -> bool
where
    D: DomTree + ?Sized,
    M: MetadataSource + ?Sized,
{
    let attributes = link_text(dom, element)
        .map(|text| resolver.resolve_link(&text, ""))
        .unwrap_or_default();
    applicator::apply(dom, element, &attributes)
}
