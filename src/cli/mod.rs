//! Command-line interface for blocklist-merge
//!
//! Single command: normalize one raw list and merge it into one section of
//! the target file. Without `--run` the merge is computed and reported but
//! nothing is written.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod merge;

/// Plain-text copy of each run's diagnostics, written to the working
/// directory.
const LOG_FILE: &str = "blocklist-merge.log";

/// Merge raw domain lists into curated, sectioned DNS blocklists
#[derive(Parser)]
#[command(name = "blocklist-merge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Section name to update (eg: "Scam" or "typosquatting")
    #[arg(short, long, value_name = "NAME")]
    pub section: Option<String>,

    /// File with "raw" data; see the README for supported formats and substitutions
    #[arg(short, long, value_name = "PATH")]
    pub filename: Option<PathBuf>,

    /// Target file; if it exists, it will be updated with the new content
    #[arg(short, long, value_name = "PATH")]
    pub target: Option<PathBuf>,

    /// Substitution file (JSON/TOML/YAML); subs.* in the working directory is used when omitted
    #[arg(long, value_name = "FILE")]
    pub subs: Option<PathBuf>,

    /// Write the merged result; without this flag the merge is a dry run
    #[arg(long)]
    pub run: bool,

    /// Debug mode. Writes a lot
    #[arg(long)]
    pub debug: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub completions: Option<Shell>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "blocklist-merge", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(cli.debug);
    merge::run(cli)
}

/// Wire the --debug flag to the tracing log level.
///
/// RUST_LOG in the environment always takes precedence; --debug falls back
/// to DEBUG, the default is INFO. Diagnostics go to stderr and to the log
/// file; stdout is reserved for the summary.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    // A read-only working directory must not kill the run over logging.
    match File::create(LOG_FILE) {
        Ok(log_file) => {
            let file_layer = fmt::layer()
                .with_writer(Arc::new(log_file))
                .with_target(false)
                .with_ansi(false);
            let _ = tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .with(filter)
                .try_init();
        }
        Err(_) => {
            let _ = tracing_subscriber::registry().with(stderr_layer).with(filter).try_init();
        }
    }
}
