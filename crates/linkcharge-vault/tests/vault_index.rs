//! Vault scanning and watching against real directories.

use linkcharge_core::{AttributeResolver, MetadataSource, RuleSet, Settings};
use linkcharge_vault::{VaultIndex, VaultWatcher};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn write(dir: &TempDir, path: &str, content: &str) {
    let full = dir.path().join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

fn sample_vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(&dir, "A.md", "Links to [[B#section|Alias]].");
    write(&dir, "B.md", "---\nstatus: active\ntags: [alpha]\n---\nBody #beta\n");
    write(&dir, "Projects/B.md", "---\nstatus: archived\n---\n");
    write(&dir, ".obsidian/hidden.md", "---\nstatus: hidden\n---\n");
    write(&dir, "image.png", "not a note");
    dir
}

#[test]
fn scan_indexes_visible_markdown_only() {
    let dir = sample_vault();
    let index = VaultIndex::open(dir.path()).unwrap();

    let paths: Vec<_> = index.paths().collect();
    assert_eq!(paths, vec!["A.md", "B.md", "Projects/B.md"]);
    assert_eq!(index.get("B.md").unwrap().tags, vec!["beta"]);
}

#[test]
fn resolution_prefers_source_folder() {
    let dir = sample_vault();
    let index = VaultIndex::open(dir.path()).unwrap();
    let rules = RuleSet::compile(&Settings {
        target_attributes: vec!["status".into(), "tags".into()],
        target_tags: true,
        ..Settings::default()
    })
    .0;
    let resolver = AttributeResolver::new(&index, &rules);

    let root = resolver.resolve_link("B#section", "A.md");
    assert_eq!(root.get("status"), Some("active"));
    assert_eq!(root.get("tags"), Some("alpha beta"));

    let nested = resolver.resolve_link("B", "Projects/Index.md");
    assert_eq!(nested.get("status"), Some("archived"));

    assert!(index.resolve_link_target("Missing", "A.md").is_none());
}

#[test]
fn apply_changes_reindexes_and_forgets() {
    let dir = sample_vault();
    let mut index = VaultIndex::open(dir.path()).unwrap();

    write(&dir, "B.md", "---\nstatus: done\n---\n");
    fs::remove_file(dir.path().join("Projects/B.md")).unwrap();
    let changed = [
        dir.path().join("B.md"),
        dir.path().join("Projects/B.md"),
        dir.path().join("image.png"),
    ];
    let batch = index.apply_changes(changed.iter().map(|p| p.as_path()));

    assert_eq!(batch.paths, vec!["B.md".to_string(), "Projects/B.md".to_string()]);
    assert_eq!(
        index.get("B.md").and_then(|m| m.frontmatter.get("status")).cloned(),
        Some(serde_json::json!("done"))
    );
    assert!(index.get("Projects/B.md").is_none());
}

#[tokio::test]
async fn watcher_reports_changed_notes() {
    let dir = sample_vault();
    let (watcher, mut changes) =
        VaultWatcher::start(dir.path(), Duration::from_millis(50)).unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    write(&dir, "C.md", "---\nstatus: new\n---\n");

    let batch = tokio::time::timeout(Duration::from_secs(10), changes.recv())
        .await
        .expect("no change reported")
        .expect("watcher channel closed");
    assert!(batch.iter().any(|p| p.file_name().is_some_and(|n| n == "C.md")));

    watcher.stop();
}
