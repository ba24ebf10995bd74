//! Merge command driver.
//!
//! Orchestrates one invocation end to end: load substitutions, parse the
//! raw list, parse the target, merge, report, and (under --run) replace
//! the target atomically.

use anyhow::{bail, Context, Result};
use console::style;
use std::env;
use std::fs;
use tracing::{debug, info};

use super::Cli;
use crate::config::load_substitutions;
use crate::domain::{MergeOutcome, RawStats, TargetDocument};
use crate::merge::merge_into_section;
use crate::raw::RawParser;
use crate::render::write_target;
use crate::target::parse_target;

pub fn run(cli: Cli) -> Result<()> {
    let Cli { section, filename, target, subs, run, .. } = cli;

    let Some(section) = section else {
        bail!("--section is required (eg: --section Scam)");
    };
    let Some(raw_path) = filename else {
        bail!("--filename is required");
    };
    let Some(target_path) = target else {
        bail!("--target is required");
    };

    let cwd = env::current_dir().context("Failed to resolve working directory")?;
    let subs_table = load_substitutions(&cwd, subs.as_deref())?;
    debug!("substitution table has {} rules", subs_table.len());

    // Raw input first: an unreadable input aborts before the target is read,
    // let alone written.
    let mut parser = RawParser::new(subs_table);
    let candidates = parser.parse_file(&raw_path)?;
    debug!("loaded {} candidate domains from {}", candidates.len(), raw_path.display());

    let mut doc = if target_path.exists() {
        let text = fs::read_to_string(&target_path)
            .with_context(|| format!("Failed to read target file: {}", target_path.display()))?;
        parse_target(&text)
            .with_context(|| format!("Malformed target file: {}", target_path.display()))?
    } else {
        info!("target file {} does not exist and will be created", target_path.display());
        TargetDocument::default()
    };

    if doc.sections().any(|s| s.matches(&section)) {
        info!("section {:?} found in {} and will be updated", section, target_path.display());
    } else {
        info!(
            "section {:?} not found in {}; a new section will be created",
            section,
            target_path.display()
        );
    }

    let outcome = merge_into_section(&mut doc, &section, &candidates);
    print_summary(&section, parser.stats(), &outcome);

    if run {
        write_target(&target_path, &doc)?;
        println!("{} {}", style("Updated").green().bold(), target_path.display());
    } else {
        println!(
            "{}",
            style(format!("Dry run; pass --run to update {}", target_path.display())).yellow()
        );
    }

    Ok(())
}

fn print_summary(section: &str, stats: &RawStats, outcome: &MergeOutcome) {
    let status = if outcome.created_section { "new" } else { "existing" };
    println!("Section: {} ({})", section, status);
    println!("Raw lines read: {}", stats.lines_read);
    println!("Candidate domains: {}", stats.domains);
    println!(
        "Skipped lines: {} ({} empty, {} comments, {} invalid)",
        stats.skipped_empty + stats.skipped_comment + stats.skipped_invalid,
        stats.skipped_empty,
        stats.skipped_comment,
        stats.skipped_invalid
    );
    println!("New unique domains: {}", outcome.added);
    println!("Already present: {}", outcome.already_present);
    println!("Section total after merge: {}", outcome.total_after);
}
