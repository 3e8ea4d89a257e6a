//! Output rendering for the install report and the target listing.
//!
//! Supports `human` (default) and `json` outputs. The JSON form serializes
//! the report as-is; composition is kept in pure functions so shape tests
//! need no terminal.

use crate::install::InstallContext;
use crate::models::catalog::Catalog;
use crate::models::{InstallOutcome, Report, Severity};
use crate::utils::display_path;
use owo_colors::OwoColorize;
use serde_json::{json, Value as JsonVal};
use std::path::Path;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn outcome_label(outcome: &InstallOutcome) -> &'static str {
    match outcome {
        InstallOutcome::Installed => "installed",
        InstallOutcome::WouldInstall => "would install",
        InstallOutcome::SourceMissing => "source missing",
        InstallOutcome::SourceInvalid { .. } => "source invalid",
        InstallOutcome::DestinationInvalid { .. } => "destination invalid",
        InstallOutcome::CopyFailed { .. } => "copy failed",
        InstallOutcome::PartiallyInstalled { .. } => "partially installed",
    }
}

/// Print the report in the requested format.
pub fn print_report(report: &Report, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_report_json(report)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            for t in &report.targets {
                let label = outcome_label(&t.outcome);
                let ok = !t.outcome.is_failure();
                let status = if !color {
                    format!("[{}]", label)
                } else if ok {
                    format!("[{}]", label).green().bold().to_string()
                } else if t.severity == Severity::Warning {
                    format!("[{}]", label).yellow().bold().to_string()
                } else {
                    format!("[{}]", label).red().bold().to_string()
                };
                let dest = display_path(Path::new(&t.destination));
                match (&t.outcome, t.outcome.reason()) {
                    (InstallOutcome::PartiallyInstalled { copied, failed }, _) => {
                        println!(
                            "{} {} -> {} ({} copied, {} failed)",
                            status, t.name, dest, copied, failed
                        );
                    }
                    (_, Some(reason)) => {
                        println!("{} {} -> {} — {}", status, t.name, dest, reason)
                    }
                    _ => println!("{} {} -> {}", status, t.name, dest),
                }
            }
            let failed_checks: Vec<_> = report.checks.iter().filter(|c| !c.passed).collect();
            for c in &failed_checks {
                let prefix = if !color {
                    "check failed:".to_string()
                } else if c.severity == Severity::Warning {
                    "check failed:".yellow().bold().to_string()
                } else {
                    "check failed:".red().bold().to_string()
                };
                println!("{} {} — {}", prefix, c.name, c.detail);
            }
            if !report.checks.is_empty() {
                println!(
                    "verification: {} checks, {} failed",
                    report.checks.len(),
                    failed_checks.len()
                );
            }
            let summary = format!(
                "— Summary — installed={} errors={} warnings={}",
                report.summary.installed, report.summary.errors, report.summary.warnings
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print the catalog's target list (names, destinations, formats).
pub fn print_targets(catalog: &Catalog, cx: &InstallContext, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_targets_json(catalog, cx)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            for t in &catalog.targets {
                let dest = cx.dest_path(t);
                let name = if color {
                    t.name.bold().to_string()
                } else {
                    t.name.clone()
                };
                let transform = t
                    .transform
                    .map(|tr| format!(", transform={}", tr.as_str()))
                    .unwrap_or_default();
                println!(
                    "{} -> {} (format={}, kind={}, severity={}{})",
                    name,
                    dest.to_string_lossy(),
                    t.format.as_str(),
                    t.kind.as_str(),
                    t.severity.as_str(),
                    transform,
                );
            }
            println!("{} target(s)", catalog.targets.len());
        }
    }
}

/// Compose the report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &Report) -> JsonVal {
    serde_json::to_value(report).unwrap()
}

/// Compose the target-list JSON object (pure) for testing purposes.
pub fn compose_targets_json(catalog: &Catalog, cx: &InstallContext) -> JsonVal {
    let items: Vec<_> = catalog
        .targets
        .iter()
        .map(|t| {
            json!({
                "name": t.name,
                "source": cx.source_path(t).to_string_lossy(),
                "destination": cx.dest_path(t).to_string_lossy(),
                "format": t.format,
                "kind": t.kind,
                "severity": t.severity,
                "transform": t.transform,
            })
        })
        .collect();
    json!({"targets": items, "total": catalog.targets.len()})
}
