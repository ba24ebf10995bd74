//! Target document parsing.
//!
//! The target file is plain text organized into named sections delimited
//! by marker lines, with anything outside a section preserved verbatim:
//!
//! ```text
//! ### Scam domains start
//! # optional comment lines
//! bad.com
//! evil.net
//! ### Scam domains end
//! ```
//!
//! Structural damage is fatal; a partially-understood target is never
//! rewritten.

use crate::domain::{Block, Section, TargetDocument};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static SECTION_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^###\s+(.+?)\s+domains start$").expect("valid regex"));
static SECTION_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^###\s+(.+?)\s+domains end$").expect("valid regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("line {line}: section '{name}' opens inside unterminated section '{open}'")]
    NestedSection { line: usize, name: String, open: String },

    #[error("line {line}: end marker for '{name}' without a matching start")]
    OrphanEnd { line: usize, name: String },

    #[error("line {line}: end marker for '{name}' does not close open section '{open}'")]
    MismatchedEnd { line: usize, name: String, open: String },

    #[error("line {line}: duplicate section '{name}'")]
    DuplicateSection { line: usize, name: String },

    #[error("section '{name}' is never terminated")]
    UnterminatedSection { name: String },
}

/// Parse the full target text into an ordered document.
///
/// Inside a section, `#`-prefixed lines are comments, blank lines are
/// ignored, and everything else is a host line kept as-is. Lines outside
/// any section are collected into verbatim blocks with blank edges
/// trimmed; inter-block whitespace is owned by the renderer.
pub fn parse_target(text: &str) -> Result<TargetDocument, TargetError> {
    let mut doc = TargetDocument::default();
    let mut verbatim: Vec<String> = Vec::new();
    let mut current: Option<Section> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if let Some(caps) = SECTION_START.captures(line) {
            let name = caps[1].to_string();
            if let Some(open) = &current {
                return Err(TargetError::NestedSection {
                    line: line_no,
                    name,
                    open: open.name.clone(),
                });
            }
            if doc.sections().any(|s| s.matches(&name)) {
                return Err(TargetError::DuplicateSection { line: line_no, name });
            }
            flush_verbatim(&mut doc, &mut verbatim);
            current = Some(Section::new(name));
            continue;
        }

        if let Some(caps) = SECTION_END.captures(line) {
            let name = caps[1].to_string();
            match current.take() {
                None => return Err(TargetError::OrphanEnd { line: line_no, name }),
                Some(open) if !open.matches(&name) => {
                    return Err(TargetError::MismatchedEnd {
                        line: line_no,
                        name,
                        open: open.name,
                    });
                }
                Some(open) => doc.push_section(open),
            }
            continue;
        }

        match &mut current {
            Some(section) => {
                if line.is_empty() {
                    continue;
                }
                if line.starts_with('#') {
                    section.comments.push(line.to_string());
                } else {
                    section.hosts.insert(line.to_string());
                }
            }
            None => verbatim.push(raw_line.to_string()),
        }
    }

    if let Some(open) = current {
        return Err(TargetError::UnterminatedSection { name: open.name });
    }
    flush_verbatim(&mut doc, &mut verbatim);
    Ok(doc)
}

fn flush_verbatim(doc: &mut TargetDocument, buffer: &mut Vec<String>) {
    let lines = std::mem::take(buffer);
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return;
    };
    let end = lines.iter().rposition(|l| !l.trim().is_empty()).unwrap_or(start);
    doc.blocks.push(Block::Verbatim(lines[start..=end].to_vec()));
}
