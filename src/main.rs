//! blocklist-merge: Merge raw domain lists into curated, sectioned blocklists
//!
//! This tool normalizes raw candidate domains (deobfuscating `[.]`-style
//! artifacts) and merges them into one named section of a sectioned target
//! file, keeping every section's host list unique and sorted.

use anyhow::Result;

fn main() -> Result<()> {
    blocklist_merge::cli::run()
}
