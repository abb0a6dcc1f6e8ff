use anyhow::Result;
use linkcharge_core::{AttributeResolver, MetadataSource, RuleSet, Settings};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// DOM attributes the link would carry, keyed by `data-link-*` name.
pub fn resolve_link<M>(
    source: &M,
    settings: &Settings,
    link: &str,
    from: &str,
) -> BTreeMap<String, String>
where
    M: MetadataSource + ?Sized,
{
    let (rules, diagnostics) = RuleSet::compile(settings);
    for diagnostic in &diagnostics {
        warn!("{}", diagnostic);
    }
    AttributeResolver::new(source, &rules).resolve_link(link, from).to_dom()
}

pub fn execute(vault: &Path, settings: Settings, link: &str, from: &str) -> Result<()> {
    let index = super::open_vault(vault)?;
    let attributes = resolve_link(&index, &settings, link, from);
    println!("{}", serde_json::to_string_pretty(&attributes)?);
    Ok(())
}
