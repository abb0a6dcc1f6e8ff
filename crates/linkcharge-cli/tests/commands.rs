//! Subcommands against a temporary vault.

use linkcharge_cli::cli::{Cli, Commands, LogLevel};
use linkcharge_cli::commands::{check, decorate, open_vault, resolve, watch::PanelMirror};
use clap::Parser;
use linkcharge_config::{PanelBinding, RuleConfig};
use linkcharge_core::{LinkCoordinator, MemoryDom, Selector, Settings};
use std::fs;
use tempfile::TempDir;
use tracing_subscriber::filter::LevelFilter;

fn vault() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("A.md"), "See [[B#intro|the B note]] and [[Nowhere]].\n").unwrap();
    fs::write(dir.path().join("B.md"), "---\nstatus: active\npriority: 2\n---\n# B\n").unwrap();
    dir
}

fn settings() -> Settings {
    Settings {
        target_attributes: vec!["status".into()],
        ..Settings::default()
    }
}

#[test]
fn cli_parses_global_flags() {
    let cli = Cli::parse_from([
        "lch", "-d", "/tmp/vault", "resolve", "B", "--from", "A.md", "-l", "trace",
    ]);
    assert_eq!(cli.log_level, Some(LogLevel::Trace));
    assert_eq!(cli.level(), LevelFilter::TRACE);
    assert!(matches!(
        cli.command,
        Commands::Resolve { ref link, ref from } if link == "B" && from == "A.md"
    ));

    let cli = Cli::parse_from(["lch", "-v", "check"]);
    assert_eq!(cli.level(), LevelFilter::DEBUG);
}

#[test]
fn resolve_reports_dom_attributes() {
    let dir = vault();
    let index = open_vault(dir.path()).unwrap();
    let settings = Settings {
        rules: vec![RuleConfig::copy_field("priority").with_attribute("prio")],
        ..settings()
    };

    let attributes = resolve::resolve_link(&index, &settings, "B#intro", "A.md");
    assert_eq!(attributes.get("data-link-status").map(String::as_str), Some("active"));
    assert_eq!(attributes.get("data-link-prio").map(String::as_str), Some("2"));

    assert!(resolve::resolve_link(&index, &settings, "Nowhere", "A.md").is_empty());
}

#[test]
fn decorate_marks_link_and_alias() {
    let dir = vault();
    let index = open_vault(dir.path()).unwrap();
    let text = fs::read_to_string(dir.path().join("A.md")).unwrap();

    let decorations = decorate::decorate_text(&index, settings(), "A.md", &text, None, None);
    assert_eq!(decorations.widgets().count(), 1);
    assert_eq!(decorations.marks().count(), 2);

    let lines = decorate::render(&text, &decorations);
    assert!(lines[0].contains("widget .data-link-icon"));
    assert!(lines
        .iter()
        .any(|l| l.contains("\"the B note\"") && l.contains("data-link-status=\"active\"")));
}

#[test]
fn check_reports_malformed_configuration() {
    let report = check::check_settings(Settings {
        rules: vec![RuleConfig::copy_field("status").with_pattern("(unclosed")],
        panels: vec![PanelBinding::full("search", "div > a")],
        ..settings()
    });
    assert_eq!(report.rules, 1);
    assert_eq!(report.panel_bindings, 1);
    assert_eq!(report.diagnostics.len(), 2);

    assert!(check::check_settings(settings()).diagnostics.is_empty());
}

#[test]
fn panel_mirror_follows_vault_and_gets_decorated() {
    let dir = vault();
    let index = open_vault(dir.path()).unwrap();
    let mut dom = MemoryDom::new();
    let selector = Selector::parse(".nav-file-title-content").unwrap();
    let mut mirror = PanelMirror::open(&mut dom, "file-explorer", &selector);
    mirror.sync_items(&mut dom, index.paths());

    let mut coordinator = LinkCoordinator::new(settings());
    coordinator.on_layout_changed(&mut dom, &index);

    let snapshot = mirror.snapshot(&dom);
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot["A.md"].is_empty());
    assert_eq!(snapshot["B.md"].get("data-link-status").map(String::as_str), Some("active"));

    mirror.sync_items(&mut dom, ["B.md"]);
    assert_eq!(mirror.snapshot(&dom).len(), 1);

    coordinator.teardown(&mut dom);
    assert!(mirror.snapshot(&dom)["B.md"].is_empty());
    assert_eq!(dom.active_observers(), 0);
}
