//! Dotsmith CLI binary entry point.
//! Delegates to modules for deploy/targets and prints results.

mod cli;
mod config;
mod convert;
mod deploy;
mod install;
mod models;
mod output;
mod utils;
mod validate;
mod verify;

use clap::Parser;
use cli::{Cli, Commands};
use install::InstallContext;
use models::catalog;
use std::path::{Path, PathBuf};

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Install {
            repo_root,
            catalog,
            dest_root,
            dry_run,
            output,
            jobs,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                catalog.as_deref(),
                dest_root.as_deref(),
                output.as_deref(),
                if dry_run { Some(true) } else { None },
                jobs,
            );
            let (cat, cx) = load_catalog_or_exit(&eff);
            match deploy::run_deploy(&cat, &cx, eff.dry_run, eff.jobs) {
                Ok(report) => {
                    output::print_report(&report, &eff.output);
                    if report.summary.errors > 0 {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            }
        }
        Commands::Targets {
            repo_root,
            catalog,
            dest_root,
            output,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                catalog.as_deref(),
                dest_root.as_deref(),
                output.as_deref(),
                None,
                None,
            );
            let (cat, cx) = load_catalog_or_exit(&eff);
            output::print_targets(&cat, &cx, &eff.output);
        }
    }
}

/// Resolve the catalog path, load it, and build the install context.
/// Catalog-level problems are configuration errors: exit 2.
fn load_catalog_or_exit(eff: &config::Effective) -> (catalog::Catalog, InstallContext) {
    if !eff.catalog_configured {
        eprintln!(
            "{} {}",
            utils::error_prefix(),
            "Catalog is not configured. Pass --catalog or add dotsmith.toml."
        );
        std::process::exit(2);
    }
    if config::load_config(&eff.repo_root).is_none() {
        eprintln!(
            "{} {}",
            utils::note_prefix(),
            "No dotsmith.toml found; using defaults."
        );
    }
    let cat_path = eff.repo_root.join(&eff.catalog);
    if !cat_path.is_file() {
        eprintln!(
            "{} {}",
            utils::error_prefix(),
            format!(
                "Catalog file not found: {} (pass --catalog or configure dotsmith.toml)",
                cat_path.to_string_lossy()
            )
        );
        std::process::exit(2);
    }
    let cat = match catalog::load_catalog(&cat_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(2);
        }
    };
    let catalog_dir = cat_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let cx = InstallContext {
        catalog_dir,
        dest_root: eff.dest_root.clone(),
        home: eff.home.clone(),
    };
    (cat, cx)
}
