use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};
use colored::Colorize;
use driftwatch::pipeline::{self, RunOptions};
use driftwatch::store::SnapshotStore;
use driftwatch::utils::display_relative;
use driftwatch::{DriftwatchContext, output};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "drift",
    version = driftwatch::VERSION,
    about = "Directory-tree integrity tracker",
    long_about = "Tracks a directory tree across runs and tells accidental deletions \
                  apart from moves and renames by content checksum"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a tree and report files added, deleted, or probably moved.
    ///
    /// Exit code 0 means no deletions, 1 means deletions were found,
    /// 2 means the run (or snapshot persistence) failed.
    Scan {
        /// Root of the tree to scan (default: config, then current directory)
        root: Option<PathBuf>,

        /// Snapshot file to compare against and update
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Directory-name pattern; repeatable, `!`-prefixed patterns exclude
        #[arg(short, long = "pattern")]
        patterns: Vec<String>,

        /// Do not update the snapshot after this run
        #[arg(long)]
        no_update: bool,

        /// Embedded mode: no banner, no blocking prompt
        #[arg(long)]
        embedded: bool,
    },

    /// Print the contents of a stored snapshot
    Show {
        /// Snapshot file to read (default: from config)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if cli.quiet {
        output::set_verbosity(output::Verbosity::Quiet);
    }

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            process::exit(2);
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("driftwatch={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Scan {
            root,
            snapshot,
            patterns,
            no_update,
            embedded,
        } => {
            let mut ctx = DriftwatchContext::new(root, snapshot)?;
            if !patterns.is_empty() {
                ctx.config.scan.folder_patterns = patterns;
            }

            let options = RunOptions {
                update_snapshot: !no_update,
                show_progress: !cli.quiet,
            };
            let outcome = pipeline::run(&ctx, &options)?;

            print_report(&ctx, &outcome.report);
            if no_update {
                output::warning("Snapshot left unchanged (--no-update)");
            }

            if !embedded {
                if outcome.report.deletions_found() {
                    output::deletion_banner();
                }
                wait_for_acknowledgment()?;
            }

            if let Some(e) = outcome.persist_error {
                output::error(&format!("Failed to update snapshot: {e:#}"));
                return Ok(2);
            }
            Ok(i32::from(outcome.report.deletions_found()))
        }
        Commands::Show { snapshot } => {
            let ctx = DriftwatchContext::new(None, snapshot)?;
            show_snapshot(&ctx)?;
            Ok(0)
        }
        Commands::Completion { shell } => {
            print_completions(shell, &mut Cli::command());
            Ok(0)
        }
    }
}

fn print_report(ctx: &DriftwatchContext, report: &pipeline::RunReport) {
    output::info(&format!(
        "Scanned {} files under {}",
        report.scanned,
        ctx.root.display()
    ));
    output::info(&format!(
        "{} added, {} removed ({} with a probable new location), {} unreadable",
        report.added.len(),
        report.removed.len(),
        report.matched_count(),
        report.skipped.len()
    ));

    for result in report.matches.iter().filter(|m| m.is_matched()) {
        let lost = display_relative(&result.removed.path, &ctx.root);
        for candidate in &result.candidates {
            let found = display_relative(&candidate.path, &ctx.root);
            output::info(&format!(
                "  {} probably moved to {}",
                lost.display(),
                found.display()
            ));
        }
    }

    if !report.skipped.is_empty() {
        output::warning(&format!(
            "{} files could not be read and were skipped",
            report.skipped.len()
        ));
    }
    if !report.deletions_found() {
        output::success("No deletions found");
    }
}

fn wait_for_acknowledgment() -> Result<()> {
    eprint!("\nPROCESS FINISHED - PRESS ENTER TO RESUME ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

fn show_snapshot(ctx: &DriftwatchContext) -> Result<()> {
    let store = SnapshotStore::new(
        ctx.snapshot_path.clone(),
        ctx.config.core.compression_level,
    );
    let Some(inventory) = store.load()? else {
        println!("No snapshot at {}", ctx.snapshot_path.display());
        return Ok(());
    };

    println!(
        "Snapshot {} ({} entries, created {})",
        ctx.snapshot_path.display(),
        inventory.len(),
        inventory.created_at
    );
    for record in &inventory.entries {
        println!(
            "{} {}",
            record.hash.as_deref().unwrap_or("-"),
            record.path.display()
        );
    }
    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
