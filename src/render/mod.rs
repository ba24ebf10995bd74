//! Deterministic rendering of the target document.
//!
//! Identical document state always renders to identical bytes, so a
//! re-run over an already-merged list rewrites the file with the exact
//! same content.

use crate::domain::{Block, Section, TargetDocument};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialize the document: blocks in document order, one blank line
/// between blocks, hosts in ascending byte order, trailing newline.
pub fn render(doc: &TargetDocument) -> String {
    let chunks: Vec<String> = doc.blocks.iter().map(render_block).collect();
    if chunks.is_empty() {
        return String::new();
    }
    let mut out = chunks.join("\n\n");
    out.push('\n');
    out
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Verbatim(lines) => lines.join("\n"),
        Block::Section(section) => render_section(section),
    }
}

fn render_section(section: &Section) -> String {
    let mut lines = Vec::with_capacity(section.comments.len() + section.hosts.len() + 2);
    lines.push(format!("### {} domains start", section.name));
    lines.extend(section.comments.iter().cloned());
    lines.extend(section.hosts.iter().cloned());
    lines.push(format!("### {} domains end", section.name));
    lines.join("\n")
}

/// Render and atomically replace `path`.
///
/// The full output is written to a temporary file in the target's
/// directory and renamed over it, so an interrupted run never leaves a
/// partially written list behind.
pub fn write_target(path: &Path, doc: &TargetDocument) -> Result<()> {
    let rendered = render(doc);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(rendered.as_bytes())
        .with_context(|| format!("Failed writing merged list for {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace target file: {}", path.display()))?;
    Ok(())
}
