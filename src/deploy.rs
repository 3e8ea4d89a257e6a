//! Deployment orchestrator: fan-out installs, barrier, verify, report.
//!
//! Targets are independent (disjoint destination paths, asserted up front),
//! so the install pass fans out over a bounded rayon pool. The outcome list
//! is collected back in catalog order regardless of completion order, which
//! keeps reports deterministic and diff-friendly. Verification starts only
//! after every install has finished.

use crate::install::{install, InstallContext};
use crate::models::catalog::{Catalog, CatalogError, ConfigTarget};
use crate::models::{Report, TargetReport};
use crate::verify::run_verify;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

/// Upper bound on concurrent installs.
pub const MAX_INSTALL_JOBS: usize = 8;

/// Run the full pass: duplicate-destination assertion, install fan-out,
/// verification, report construction.
///
/// Every target is always attempted; one malformed artifact never blocks
/// unrelated platform configs. The only fatal outcome is a catalog-level
/// configuration error, returned before anything is written.
pub fn run_deploy(
    catalog: &Catalog,
    cx: &InstallContext,
    dry_run: bool,
    jobs: Option<usize>,
) -> Result<Report, CatalogError> {
    assert_disjoint_destinations(&catalog.targets, cx)?;

    let workers = jobs
        .unwrap_or(catalog.targets.len())
        .clamp(1, MAX_INSTALL_JOBS);
    let outcomes: Vec<_> = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(|| {
            catalog
                .targets
                .par_iter()
                .map(|t| install(t, cx, dry_run))
                .collect()
        }),
        // Pool construction is best-effort; fall back to sequential.
        Err(_) => catalog
            .targets
            .iter()
            .map(|t| install(t, cx, dry_run))
            .collect(),
    };

    let targets: Vec<TargetReport> = catalog
        .targets
        .iter()
        .zip(outcomes)
        .map(|(t, outcome)| TargetReport {
            name: t.name.clone(),
            destination: cx.dest_path(t).to_string_lossy().to_string(),
            severity: t.severity,
            outcome,
        })
        .collect();

    // Hard barrier: par_iter's collect has joined every install above, so
    // verification observes the final state. Dry runs verify nothing.
    let checks = if dry_run {
        Vec::new()
    } else {
        run_verify(&catalog.targets, cx)
    };

    Ok(Report::new(targets, checks))
}

/// Refuse to run when two targets resolve to the same destination path.
fn assert_disjoint_destinations(
    targets: &[ConfigTarget],
    cx: &InstallContext,
) -> Result<(), CatalogError> {
    let mut seen: HashMap<PathBuf, &str> = HashMap::new();
    for t in targets {
        let dest = cx.dest_path(t);
        if let Some(first) = seen.insert(dest.clone(), &t.name) {
            return Err(CatalogError::DuplicateDestination {
                first: first.to_string(),
                second: t.name.clone(),
                dest,
            });
        }
    }
    Ok(())
}
