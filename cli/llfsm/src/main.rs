//! llfsm: convert and check LLFSM machines and arrangements.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use manifest::LlfsmManifest;

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(name = "llfsm", version, about = "Convert and check LLFSM editor models")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a machine directory and print a summary or write the domain JSON
    Machine {
        /// Path to a `<Name>.machine` directory
        path: PathBuf,
        /// Write the converted machine as JSON to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Convert an arrangement file together with the machines it references
    Arrangement {
        /// Path to the arrangement JSON file
        file: PathBuf,
        /// Directory machine paths are resolved against
        #[arg(long)]
        base: Option<PathBuf>,
        /// Write the converted arrangement as JSON to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Round trip a machine through the domain and back
    Check {
        /// Path to a `<Name>.machine` directory
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let (manifest, project_dir) = load_manifest_optional(&cwd)?;
    let manifest = manifest.unwrap_or_default();
    init_tracing(manifest.log_filter());

    let pretty = manifest.output.pretty;
    match cli.command {
        Commands::Machine { path, output } => {
            commands::machine::run(&path, output.as_deref(), pretty)
        }
        Commands::Arrangement { file, base, output } => {
            let base = base.or_else(|| project_dir.and_then(|dir| manifest.base_dir(&dir)));
            commands::arrangement::run(&file, base.as_deref(), output.as_deref(), pretty)
        }
        Commands::Check { path } => commands::check::run(&path),
    }
}

/// `RUST_LOG` wins over the manifest filter, which wins over the default.
fn init_tracing(manifest_filter: Option<&str>) {
    let filter = manifest_filter.unwrap_or(DEFAULT_LOG_FILTER);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<LlfsmManifest>, Option<PathBuf>)> {
    match LlfsmManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
