use anyhow::{Context, Result};
use linkcharge_core::{
    Decoration, DecorationSet, DocumentContext, LinkCoordinator, MetadataSource, Settings,
    WikilinkTokens,
};
use std::path::Path;

/// Decorations of `text` (the note at `note`) within `start..end`.
pub fn decorate_text<M>(
    source: &M,
    settings: Settings,
    note: &str,
    text: &str,
    start: Option<usize>,
    end: Option<usize>,
) -> DecorationSet
where
    M: MetadataSource + ?Sized,
{
    let end = end.unwrap_or(text.len()).min(text.len());
    let start = start.unwrap_or(0).min(end);

    let tokens = WikilinkTokens::new(text);
    let doc = DocumentContext::new(note, text, &tokens);
    let coordinator = LinkCoordinator::new(settings);
    coordinator.build_decorations_for_viewport(&[start..end], &doc, source)
}

/// One line per decoration: range, kind, covered text and attributes.
pub fn render(text: &str, decorations: &DecorationSet) -> Vec<String> {
    decorations
        .iter()
        .map(|range| {
            let attributes = super::format_attributes(range.decoration.attributes());
            match &range.decoration {
                Decoration::Widget { class, .. } => {
                    format!("{:>5}        widget .{} {}", range.range.start, class, attributes)
                }
                Decoration::Mark { .. } => format!(
                    "{:>5}..{:<5} mark   {:?} {}",
                    range.range.start,
                    range.range.end,
                    text.get(range.range.clone()).unwrap_or_default(),
                    attributes
                ),
            }
        })
        .collect()
}

pub async fn execute(
    vault: &Path,
    settings: Settings,
    note: &str,
    start: Option<usize>,
    end: Option<usize>,
) -> Result<()> {
    let index = super::open_vault(vault)?;
    let path = index.root().join(note);
    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let decorations = decorate_text(&index, settings, note, &text, start, end);
    if decorations.is_empty() {
        println!("No decorations");
    }
    for line in render(&text, &decorations) {
        println!("{}", line);
    }
    Ok(())
}
