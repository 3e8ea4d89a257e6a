//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dotsmith",
    version,
    about = "Dotsmith — AI-config deployment",
    long_about = "Dotsmith — a small, fast CLI to deploy AI-assistant configuration artifacts\nfrom a catalog into per-platform destinations, with pre/post syntax validation\nand a verification report.\n\nConfiguration precedence: CLI > dotsmith.toml > defaults.\nRun `dotsmith targets` to list the catalog's targets and destinations.",
    after_help = "Examples:\n  dotsmith install --catalog configs/catalog.toml\n  dotsmith install --catalog configs/catalog.toml --dry-run\n  dotsmith targets --catalog configs/catalog.toml --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for installing and inspecting the catalog.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current dotsmith version."
    )]
    Version,
    /// Deploy all catalog targets
    #[command(
        about = "Run the full deployment pass",
        long_about = "Validate, atomically copy, and re-validate every catalog target, then run\nthe post-install verification pass and print the report.\n\nExit codes: 0 = no errors (warnings allowed), 1 = one or more targets failed\ninstall or verification, 2 = configuration error before any work began.",
        after_help = "Examples:\n  dotsmith install --catalog configs/catalog.toml\n  dotsmith install --catalog configs/catalog.toml --dry-run --output json\n  dotsmith install --catalog configs/catalog.toml --dest-root /tmp/stage"
    )]
    Install {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Path to the target catalog TOML (required)")]
        catalog: Option<String>,
        #[arg(long, help = "Root for relative destinations (default: repo root)")]
        dest_root: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Validate sources only; write nothing")]
        dry_run: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Max parallel installs (capped at 8)")]
        jobs: Option<usize>,
    },
    /// List catalog targets
    #[command(
        about = "List catalog targets",
        long_about = "Print the catalog's target list: names, resolved destinations, formats,\nkinds, and severities. Nothing is written.",
        after_help = "Examples:\n  dotsmith targets --catalog configs/catalog.toml\n  dotsmith targets --catalog configs/catalog.toml --output json"
    )]
    Targets {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Path to the target catalog TOML (required)")]
        catalog: Option<String>,
        #[arg(long, help = "Root for relative destinations (default: repo root)")]
        dest_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
