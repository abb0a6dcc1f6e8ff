use anyhow::{bail, Result};
use linkcharge_core::{Diagnostic, LinkCoordinator, Settings};
use std::path::Path;

/// Everything worth reporting about a settings snapshot.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub rules: usize,
    pub panel_bindings: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compile `settings` the way the coordinator does and collect what it
/// reports.
pub fn check_settings(settings: Settings) -> CheckReport {
    let panel_bindings = settings.panel_bindings().len();
    let coordinator = LinkCoordinator::new(settings);
    CheckReport {
        rules: coordinator.rules().rules().len(),
        panel_bindings,
        diagnostics: coordinator.diagnostics().to_vec(),
    }
}

pub fn execute(vault: &Path, settings: Settings, strict: bool) -> Result<()> {
    let index = super::open_vault(vault)?;
    let report = check_settings(settings);

    println!("Vault: {} ({} notes)", index.root().display(), index.len());
    println!("Rules: {}", report.rules);
    println!("Panel bindings: {}", report.panel_bindings);

    if report.diagnostics.is_empty() {
        println!("No problems found");
        return Ok(());
    }
    for diagnostic in &report.diagnostics {
        println!("{}", diagnostic);
    }
    if strict {
        bail!("{} configuration problems", report.diagnostics.len());
    }
    Ok(())
}
