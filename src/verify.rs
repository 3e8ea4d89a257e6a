//! Post-install verification pass.
//!
//! Runs only after every install has completed, against the live
//! filesystem, independently of what the install pass reported. A target
//! that copied cleanly can still fail here if something else mutated the
//! destination in between.

use crate::install::{list_markdown, InstallContext};
use crate::models::catalog::ConfigTarget;
use crate::models::{ConfigFormat, Severity, TargetKind, ValidationOutcome, VerificationCheck};
use crate::validate::validate;
use std::collections::BTreeSet;
use std::fs;

/// Re-check every target's destination, one or more named checks each.
pub fn run_verify(targets: &[ConfigTarget], cx: &InstallContext) -> Vec<VerificationCheck> {
    let mut checks = Vec::new();
    for t in targets {
        match t.kind {
            TargetKind::File => verify_file(t, cx, &mut checks),
            TargetKind::Dir => verify_dir(t, cx, &mut checks),
        }
    }
    checks
}

fn verify_file(t: &ConfigTarget, cx: &InstallContext, checks: &mut Vec<VerificationCheck>) {
    let dest = cx.dest_path(t);
    let exists = dest.is_file();
    checks.push(VerificationCheck {
        name: format!("{}-exists", t.name),
        severity: t.severity,
        passed: exists,
        detail: dest.to_string_lossy().to_string(),
    });
    if t.format == ConfigFormat::Opaque || !exists {
        return;
    }
    let (passed, detail) = match fs::read(&dest) {
        Ok(bytes) => match validate(&bytes, t.format) {
            ValidationOutcome::Valid | ValidationOutcome::Skipped => (true, "well-formed".to_string()),
            ValidationOutcome::Invalid(reason) => (false, reason),
        },
        Err(e) => (false, format!("unreadable: {}", e)),
    };
    checks.push(VerificationCheck {
        name: format!("{}-wellformed", t.name),
        severity: t.severity,
        passed,
        detail,
    });
}

fn verify_dir(t: &ConfigTarget, cx: &InstallContext, checks: &mut Vec<VerificationCheck>) {
    let dest = cx.dest_path(t);
    let exists = dest.is_dir();
    checks.push(VerificationCheck {
        name: format!("{}-exists", t.name),
        severity: t.severity,
        passed: exists,
        detail: dest.to_string_lossy().to_string(),
    });
    if !exists {
        return;
    }
    let dest_set = md_names(&dest);
    checks.push(VerificationCheck {
        name: format!("{}-populated", t.name),
        severity: Severity::Warning,
        passed: !dest_set.is_empty(),
        detail: format!("{} file(s)", dest_set.len()),
    });
    // Completeness: the destination's *.md set must equal the source's.
    let src = cx.source_path(t);
    if src.is_dir() {
        let src_set = md_names(&src);
        let missing: Vec<&String> = src_set.difference(&dest_set).collect();
        let stale: Vec<&String> = dest_set.difference(&src_set).collect();
        let passed = missing.is_empty() && stale.is_empty();
        let detail = if passed {
            format!("{} file(s) in sync", src_set.len())
        } else {
            format!(
                "missing: [{}], stale: [{}]",
                missing
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                stale
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        checks.push(VerificationCheck {
            name: format!("{}-complete", t.name),
            severity: t.severity,
            passed,
            detail,
        });
    }
}

fn md_names(dir: &std::path::Path) -> BTreeSet<String> {
    list_markdown(dir)
        .unwrap_or_default()
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn context(root: &Path) -> InstallContext {
        InstallContext {
            catalog_dir: root.join("configs"),
            dest_root: root.join("out"),
            home: root.join("home"),
        }
    }

    fn file_target(name: &str, format: ConfigFormat) -> ConfigTarget {
        ConfigTarget {
            name: name.into(),
            source: format!("{}.src", name),
            dest: format!("editor/{}.cfg", name),
            format,
            kind: TargetKind::File,
            severity: Severity::Error,
            transform: None,
        }
    }

    #[test]
    fn test_missing_destination_fails_exists_check() {
        let tmp = tempdir().unwrap();
        let cx = context(tmp.path());
        let t = file_target("settings", ConfigFormat::Json);
        let checks = run_verify(std::slice::from_ref(&t), &cx);
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].name, "settings-exists");
        assert!(!checks[0].passed);
    }

    #[test]
    fn test_wellformed_check_catches_corrupted_destination() {
        let tmp = tempdir().unwrap();
        let cx = context(tmp.path());
        let t = file_target("settings", ConfigFormat::Json);
        let dest = cx.dest_path(&t);
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        // e.g. another process truncated the file after install
        fs::write(&dest, br#"{"a":"#).unwrap();

        let checks = run_verify(std::slice::from_ref(&t), &cx);
        assert_eq!(checks.len(), 2);
        assert!(checks[0].passed);
        assert_eq!(checks[1].name, "settings-wellformed");
        assert!(!checks[1].passed);
    }

    #[test]
    fn test_opaque_file_gets_no_wellformed_check() {
        let tmp = tempdir().unwrap();
        let cx = context(tmp.path());
        let t = file_target("prompt", ConfigFormat::Opaque);
        let dest = cx.dest_path(&t);
        fs::create_dir_all(dest.parent().unwrap()).unwrap();
        fs::write(&dest, b"free-form\n").unwrap();

        let checks = run_verify(std::slice::from_ref(&t), &cx);
        assert_eq!(checks.len(), 1);
        assert!(checks[0].passed);
    }

    #[test]
    fn test_dir_completeness_flags_stale_and_missing() {
        let tmp = tempdir().unwrap();
        let cx = context(tmp.path());
        let t = ConfigTarget {
            name: "commands".into(),
            source: "commands".into(),
            dest: "editor/commands".into(),
            format: ConfigFormat::Opaque,
            kind: TargetKind::Dir,
            severity: Severity::Error,
            transform: None,
        };
        let src = cx.source_path(&t);
        let dest = cx.dest_path(&t);
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(src.join("a.md"), b"# a\n").unwrap();
        fs::write(src.join("b.md"), b"# b\n").unwrap();
        fs::write(dest.join("a.md"), b"# a\n").unwrap();
        fs::write(dest.join("stale.md"), b"# old\n").unwrap();

        let checks = run_verify(std::slice::from_ref(&t), &cx);
        let complete = checks
            .iter()
            .find(|c| c.name == "commands-complete")
            .unwrap();
        assert!(!complete.passed);
        assert!(complete.detail.contains("b.md"));
        assert!(complete.detail.contains("stale.md"));
        let populated = checks
            .iter()
            .find(|c| c.name == "commands-populated")
            .unwrap();
        assert!(populated.passed);
        assert_eq!(populated.severity, Severity::Warning);
    }
}
