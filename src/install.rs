//! Target installer: validate-source, atomic copy, validate-destination.
//!
//! This is the only module that writes to the filesystem. All writes go
//! through write-temp-then-rename in the destination directory, so a
//! concurrent reader never observes a half-written file. A source that
//! fails validation never touches its destination.

use crate::convert::mcp_to_opencode;
use crate::models::catalog::ConfigTarget;
use crate::models::{
    ConfigFormat, InstallOutcome, TargetKind, Transform, ValidationOutcome,
};
use crate::utils::expand_tilde;
use crate::validate::validate;
use std::fs;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
/// Resolved roots for one run, threaded into every install and verify call.
pub struct InstallContext {
    /// Sources are resolved relative to the catalog file's directory.
    pub catalog_dir: PathBuf,
    /// Relative destinations join this root.
    pub dest_root: PathBuf,
    /// Home directory for `~` expansion in destinations.
    pub home: PathBuf,
}

impl InstallContext {
    /// Absolute source path for a target.
    pub fn source_path(&self, target: &ConfigTarget) -> PathBuf {
        self.catalog_dir.join(&target.source)
    }

    /// Absolute destination path for a target (`~` expanded, relatives
    /// joined under `dest_root`).
    pub fn dest_path(&self, target: &ConfigTarget) -> PathBuf {
        let expanded = expand_tilde(&target.dest, &self.home);
        if expanded.is_absolute() {
            expanded
        } else {
            self.dest_root.join(expanded)
        }
    }
}

/// Install one catalog target, producing its outcome.
///
/// Any unexpected panic inside the per-target work is caught here and
/// converted into `CopyFailed`, so one bad target can never abort the
/// orchestrator loop.
pub fn install(target: &ConfigTarget, cx: &InstallContext, dry_run: bool) -> InstallOutcome {
    let src = cx.source_path(target);
    let dest = cx.dest_path(target);
    let format = target.format;
    let kind = target.kind;
    let transform = target.transform;
    match catch_unwind(AssertUnwindSafe(|| match kind {
        TargetKind::File => install_file(&src, &dest, format, transform, dry_run),
        TargetKind::Dir => install_dir(&src, &dest, format, dry_run),
    })) {
        Ok(outcome) => outcome,
        Err(_) => InstallOutcome::CopyFailed {
            reason: "unexpected failure during install".to_string(),
        },
    }
}

/// List the `*.md` members of a directory target, lexicographically.
pub fn list_markdown(dir: &Path) -> Result<Vec<PathBuf>, String> {
    // The directory component is literal; only the *.md part is a pattern.
    let mut pattern = glob::Pattern::escape(&dir.to_string_lossy());
    pattern.push_str("/*.md");
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| format!("bad glob pattern: {}", e))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(files)
}

fn install_file(
    src: &Path,
    dest: &Path,
    format: ConfigFormat,
    transform: Option<Transform>,
    dry_run: bool,
) -> InstallOutcome {
    if !src.exists() {
        return InstallOutcome::SourceMissing;
    }
    let bytes = match fs::read(src) {
        Ok(b) => b,
        Err(e) => {
            return InstallOutcome::CopyFailed {
                reason: format!("source read failed: {}", e),
            }
        }
    };
    if let ValidationOutcome::Invalid(reason) = validate(&bytes, format) {
        return InstallOutcome::SourceInvalid { reason };
    }
    if dry_run {
        return InstallOutcome::WouldInstall;
    }
    let bytes = match apply_transform(bytes, transform) {
        Ok(b) => b,
        Err(outcome) => return outcome,
    };
    if dest.is_dir() {
        return InstallOutcome::DestinationInvalid {
            reason: "destination exists and is a directory".to_string(),
        };
    }
    if let Some(parent) = dest.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            return InstallOutcome::DestinationInvalid {
                reason: format!("cannot create parent directory: {}", e),
            };
        }
    }
    if let Err(reason) = write_atomic(dest, &bytes) {
        return InstallOutcome::CopyFailed { reason };
    }
    // Re-read and re-validate what actually landed on disk. This catches
    // filesystem-level corruption, not just source defects.
    let written = match fs::read(dest) {
        Ok(b) => b,
        Err(e) => {
            return InstallOutcome::CopyFailed {
                reason: format!("post-write read failed: {}", e),
            }
        }
    };
    if let ValidationOutcome::Invalid(reason) = validate(&written, format) {
        return InstallOutcome::CopyFailed {
            reason: format!("post-write validation failed: {}", reason),
        };
    }
    InstallOutcome::Installed
}

fn install_dir(src: &Path, dest: &Path, format: ConfigFormat, dry_run: bool) -> InstallOutcome {
    if !src.is_dir() {
        return InstallOutcome::SourceMissing;
    }
    let files = match list_markdown(src) {
        Ok(fs) => fs,
        Err(reason) => return InstallOutcome::CopyFailed { reason },
    };
    // Never clear the destination when the source enumeration came back
    // empty; an empty source is an authoring problem, not a reset request.
    if files.is_empty() {
        return InstallOutcome::SourceInvalid {
            reason: "no .md files in source directory".to_string(),
        };
    }
    if dry_run {
        return InstallOutcome::WouldInstall;
    }
    if dest.is_file() {
        return InstallOutcome::DestinationInvalid {
            reason: "destination exists and is a file".to_string(),
        };
    }
    if let Err(e) = fs::create_dir_all(dest) {
        return InstallOutcome::DestinationInvalid {
            reason: format!("cannot create destination directory: {}", e),
        };
    }
    // Clear stale managed files first, strictly before any copy. Scoped to
    // `*.md` at the top level only, never a recursive wipe.
    if let Err(e) = clear_markdown(dest) {
        return InstallOutcome::CopyFailed {
            reason: format!("failed to clear stale files: {}", e),
        };
    }
    let mut copied = 0usize;
    let mut failed = 0usize;
    for f in &files {
        let Some(file_name) = f.file_name() else {
            failed += 1;
            continue;
        };
        match install_file(f, &dest.join(file_name), format, None, false) {
            InstallOutcome::Installed => copied += 1,
            _ => failed += 1,
        }
    }
    if failed == 0 {
        InstallOutcome::Installed
    } else {
        InstallOutcome::PartiallyInstalled { copied, failed }
    }
}

/// Apply a declared document rewrite to the validated source bytes.
fn apply_transform(
    bytes: Vec<u8>,
    transform: Option<Transform>,
) -> Result<Vec<u8>, InstallOutcome> {
    match transform {
        None => Ok(bytes),
        Some(Transform::McpToOpencode) => {
            let doc: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(|e| InstallOutcome::SourceInvalid {
                    reason: e.to_string(),
                })?;
            serde_json::to_vec_pretty(&mcp_to_opencode(&doc)).map_err(|e| {
                InstallOutcome::CopyFailed {
                    reason: format!("transform serialization failed: {}", e),
                }
            })
        }
    }
}

/// Remove `*.md` regular files directly inside `dir`.
fn clear_markdown(dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let p = entry?.path();
        if p.is_file() && p.extension().is_some_and(|e| e == "md") {
            fs::remove_file(&p)?;
        }
    }
    Ok(())
}

/// Write bytes to a temp file in the destination's directory, then rename
/// over the destination. The destination is only ever the old complete
/// content or the new complete content, never a prefix of either.
fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<(), String> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| format!("temp file creation failed: {}", e))?;
    tmp.write_all(bytes)
        .map_err(|e| format!("write failed: {}", e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| format!("sync failed: {}", e))?;
    tmp.persist(dest)
        .map_err(|e| format!("rename failed: {}", e.error))?;
    Ok(())
}
