//! Shared data models: catalog targets, install outcomes, and the report.

pub mod catalog;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Declared syntax of a deployable artifact. Drives validator dispatch.
pub enum ConfigFormat {
    Json,
    Toml,
    /// Copied verbatim, no syntax check (markdown prompt/agent files).
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Shape of a target: one file, or a directory of `*.md` files.
pub enum TargetKind {
    #[default]
    File,
    Dir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// How a target's failures count toward the exit code.
pub enum Severity {
    #[default]
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Optional document rewrite applied between source validation and the
/// atomic write. Only valid on single-file JSON targets.
pub enum Transform {
    /// Claude `mcpServers` document to OpenCode `mcp` format.
    McpToOpencode,
}

impl Transform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transform::McpToOpencode => "mcp-to-opencode",
        }
    }
}

impl ConfigFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Opaque => "opaque",
        }
    }
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::File => "file",
            TargetKind::Dir => "dir",
        }
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of validating one byte buffer against a `ConfigFormat`.
pub enum ValidationOutcome {
    Valid,
    Invalid(String),
    /// Only for `Opaque`: no inspection performed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
/// Result of processing one catalog target.
pub enum InstallOutcome {
    Installed,
    /// Dry-run placeholder: source read and validated, nothing written.
    WouldInstall,
    SourceMissing,
    SourceInvalid { reason: String },
    DestinationInvalid { reason: String },
    CopyFailed { reason: String },
    PartiallyInstalled { copied: usize, failed: usize },
}

impl InstallOutcome {
    /// True for every outcome that counts against the target's severity.
    pub fn is_failure(&self) -> bool {
        !matches!(self, InstallOutcome::Installed | InstallOutcome::WouldInstall)
    }

    /// Failure reason, when the variant carries one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            InstallOutcome::SourceInvalid { reason }
            | InstallOutcome::DestinationInvalid { reason }
            | InstallOutcome::CopyFailed { reason } => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
/// One named post-install assertion from the verification pass.
pub struct VerificationCheck {
    pub name: String,
    pub severity: Severity,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
/// Per-target line of the report, emitted in catalog order.
pub struct TargetReport {
    pub name: String,
    pub destination: String,
    pub severity: Severity,
    #[serde(flatten)]
    pub outcome: InstallOutcome,
}

#[derive(Debug, Clone, Serialize)]
/// Aggregated counts derived from target outcomes and checks.
pub struct ReportSummary {
    pub installed: usize,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Serialize)]
/// The terminal artifact of a run. Built once, never mutated.
pub struct Report {
    pub targets: Vec<TargetReport>,
    pub checks: Vec<VerificationCheck>,
    pub summary: ReportSummary,
}

impl Report {
    /// Build a report, deriving the summary from outcomes and checks.
    pub fn new(targets: Vec<TargetReport>, checks: Vec<VerificationCheck>) -> Self {
        let installed = targets
            .iter()
            .filter(|t| matches!(t.outcome, InstallOutcome::Installed))
            .count();
        let count = |sev: Severity| {
            targets
                .iter()
                .filter(|t| t.outcome.is_failure() && t.severity == sev)
                .count()
                + checks
                    .iter()
                    .filter(|c| !c.passed && c.severity == sev)
                    .count()
        };
        Report {
            summary: ReportSummary {
                installed,
                errors: count(Severity::Error),
                warnings: count(Severity::Warning),
            },
            targets,
            checks,
        }
    }
}
