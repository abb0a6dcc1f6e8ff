//! `lch watch`: a simulated panel over the whole vault, kept decorated while
//! notes change on disk.

use anyhow::{anyhow, Result};
use linkcharge_core::{
    DomTree, LinkCoordinator, MemoryDom, NodeId, Selector, Settings, DATA_LINK_PREFIX,
};
use linkcharge_vault::VaultWatcher;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// A panel listing one link element per note, shaped to match the panel
/// type's selector.
pub struct PanelMirror {
    panel_type: String,
    container: NodeId,
    tag: String,
    class: String,
    items: BTreeMap<String, NodeId>,
}

impl PanelMirror {
    /// Create the panel container and register it as an open panel.
    pub fn open(dom: &mut MemoryDom, panel_type: &str, selector: &Selector) -> Self {
        let container = dom.create_element("div", &[("class", "view-content")]);
        dom.open_panel(panel_type, container);
        Self {
            panel_type: panel_type.to_string(),
            container,
            tag: selector.tag().unwrap_or("div").to_string(),
            class: selector.classes().join(" "),
            items: BTreeMap::new(),
        }
    }

    /// Panel type.
    pub fn panel_type(&self) -> &str {
        &self.panel_type
    }

    /// Add items for new notes and drop items for notes that are gone.
    pub fn sync_items<'a, I>(&mut self, dom: &mut MemoryDom, paths: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: Vec<&str> = paths.into_iter().collect();

        let gone: Vec<String> = self
            .items
            .keys()
            .filter(|path| !wanted.contains(&path.as_str()))
            .cloned()
            .collect();
        for path in gone {
            if let Some(node) = self.items.remove(&path) {
                if let Some(row) = dom.parent(node) {
                    dom.remove_child(self.container, row);
                }
            }
        }

        for path in wanted {
            if self.items.contains_key(path) {
                continue;
            }
            let row = dom.append_element(self.container, "div", &[("class", "tree-item")]);
            let link = dom.create_element(
                &self.tag,
                &[("class", self.class.as_str()), ("data-href", path)],
            );
            dom.append_text(link, linkcharge_core::link::basename(path));
            dom.append_child(row, link);
            self.items.insert(path.to_string(), link);
        }
    }

    /// `data-link-*` attributes of every item, keyed by note path.
    pub fn snapshot(&self, dom: &MemoryDom) -> BTreeMap<String, BTreeMap<String, String>> {
        self.items
            .iter()
            .map(|(path, node)| {
                let attributes = dom
                    .attributes(*node)
                    .into_iter()
                    .filter(|(name, _)| name.starts_with(DATA_LINK_PREFIX))
                    .collect();
                (path.clone(), attributes)
            })
            .collect()
    }
}

fn print_changes(
    before: &BTreeMap<String, BTreeMap<String, String>>,
    after: &BTreeMap<String, BTreeMap<String, String>>,
) {
    for (path, attributes) in after {
        if before.get(path) != Some(attributes) {
            println!("{}: {}", path, super::format_attributes(attributes));
        }
    }
}

pub async fn execute(
    vault: &Path,
    settings: Settings,
    panel: &str,
    debounce_ms: u64,
) -> Result<()> {
    let mut index = super::open_vault(vault)?;
    let binding = settings
        .panel_bindings()
        .into_iter()
        .find(|binding| binding.panel_type == panel)
        .ok_or_else(|| anyhow!("No panel binding for '{}'", panel))?;
    let selector = Selector::parse(&binding.selector)?;

    let mut dom = MemoryDom::new();
    let mut mirror = PanelMirror::open(&mut dom, panel, &selector);
    mirror.sync_items(&mut dom, index.paths());

    let mut coordinator = LinkCoordinator::new(settings);
    let report = coordinator.on_layout_changed(&mut dom, &index);
    info!("Registered {:?}", report.registered);
    let mut shown = mirror.snapshot(&dom);
    print_changes(&BTreeMap::new(), &shown);

    let (watcher, mut changes) =
        VaultWatcher::start(index.root(), Duration::from_millis(debounce_ms))?;
    println!("Watching {} (Ctrl-C to stop)", index.root().display());

    loop {
        let deadline = coordinator.next_deadline();
        let wake = deadline.map(Instant::from_std).unwrap_or_else(Instant::now);
        tokio::select! {
            Some(paths) = changes.recv() => {
                let batch = index.apply_changes(paths.iter().map(PathBuf::as_path));
                if batch.paths.is_empty() {
                    continue;
                }
                mirror.sync_items(&mut dom, index.paths());
                for (observer, records) in dom.drain_records() {
                    coordinator.on_mutations(observer, &records, &mut dom, &index);
                }
                coordinator.on_metadata_changed(&batch);
            }
            _ = sleep_until(wake), if deadline.is_some() => {
                if let Some(refresh) = coordinator.poll(&mut dom, &index) {
                    debug!("Refresh: {:?}", refresh);
                    let current = mirror.snapshot(&dom);
                    print_changes(&shown, &current);
                    shown = current;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let teardown = coordinator.teardown(&mut dom);
    info!("Cleared {} links", teardown.cleared);
    watcher.stop();
    Ok(())
}
