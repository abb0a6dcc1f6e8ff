//! Tracing subscriber setup.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Crates whose events are shown.
const CRATES: &[&str] = &[
    "lch",
    "linkcharge_cli",
    "linkcharge_core",
    "linkcharge_config",
    "linkcharge_vault",
];

/// Filter directive for `level` across the workspace crates.
pub fn filter_directive(level: LevelFilter) -> String {
    CRATES
        .iter()
        .map(|name| format!("{}={}", name, level.to_string().to_lowercase()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber. `RUST_LOG` wins when set.
pub fn init(level: LevelFilter) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        let directive = filter_directive(LevelFilter::DEBUG);
        assert!(directive.starts_with("lch=debug,"));
        assert!(directive.contains("linkcharge_core=debug"));
    }
}
