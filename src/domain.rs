//! Core data model shared across the pipeline.

use std::collections::BTreeSet;

/// Comment line written into sections this tool creates.
pub const MANAGED_COMMENT: &str =
    "# maintained by blocklist-merge; one domain per line, sorted";

/// A named group of hosts inside the target file.
///
/// Hosts live in a `BTreeSet`, so a section is unique and sorted by
/// construction; rendering just walks the set in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Name as it appears in the heading line, casing preserved.
    pub name: String,
    /// `#`-prefixed lines between the heading and the hosts.
    pub comments: Vec<String>,
    pub hosts: BTreeSet<String>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), comments: Vec::new(), hosts: BTreeSet::new() }
    }

    /// A freshly created section with the standard comment block.
    pub fn managed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comments: vec![MANAGED_COMMENT.to_string()],
            hosts: BTreeSet::new(),
        }
    }

    /// Section names are matched ASCII case-insensitively.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// One top-level block of the target file, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Lines outside any section, preserved as-is.
    Verbatim(Vec<String>),
    Section(Section),
}

/// Parsed representation of the target file.
///
/// Built fresh from disk at the start of each invocation and fully
/// re-rendered at the end; nothing survives between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetDocument {
    pub blocks: Vec<Block>,
}

impl TargetDocument {
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Section(s) => Some(s),
            Block::Verbatim(_) => None,
        })
    }

    pub fn find_section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.blocks.iter_mut().find_map(|b| match b {
            Block::Section(s) if s.matches(name) => Some(s),
            _ => None,
        })
    }

    /// Append a section at the end of the document.
    pub fn push_section(&mut self, section: Section) {
        self.blocks.push(Block::Section(section));
    }
}

/// Ordered literal find → replace rules applied to each raw line before
/// tokenization.
///
/// File-loaded tables are ordered by key (mapping formats do not preserve
/// author order, so key order is the stable order rules run in).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionTable {
    rules: Vec<(String, String)>,
}

impl SubstitutionTable {
    pub fn new(rules: Vec<(String, String)>) -> Self {
        Self { rules }
    }

    /// Apply every rule, in table order, to one line.
    pub fn apply(&self, line: &str) -> String {
        let mut line = line.to_string();
        for (find, replace) in &self.rules {
            if line.contains(find.as_str()) {
                line = line.replace(find.as_str(), replace);
            }
        }
        line
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for SubstitutionTable {
    /// Built-in defanging rules used when no substitution file is present.
    fn default() -> Self {
        let rules = [
            ("[.]", "."),
            ("(.)", "."),
            ("[dot]", "."),
            ("(dot)", "."),
            ("hxxp://", ""),
            ("hxxps://", ""),
            ("http://", ""),
            ("https://", ""),
        ];
        Self::new(rules.iter().map(|(f, r)| (f.to_string(), r.to_string())).collect())
    }
}

/// Counters accumulated while parsing one raw input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStats {
    pub lines_read: usize,
    pub domains: usize,
    pub skipped_empty: usize,
    pub skipped_comment: usize,
    pub skipped_invalid: usize,
}

/// Result of merging one raw list into one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Domains newly inserted into the section.
    pub added: usize,
    /// Candidates that were already present (duplicates within the raw
    /// input count here after their first insertion).
    pub already_present: usize,
    /// Section size after the merge.
    pub total_after: usize,
    /// True when the section did not exist and was appended.
    pub created_section: bool,
}
