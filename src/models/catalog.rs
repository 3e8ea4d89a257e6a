//! Catalog schema: the fixed, ordered list of deployment targets.
//!
//! The catalog is a TOML file of `[[target]]` tables. It is configuration,
//! not runtime state: targets are loaded once at startup and immutable for
//! the rest of the run. The only runtime discovery allowed is the `*.md`
//! member listing inside `kind = "dir"` targets.

use crate::models::{ConfigFormat, Severity, TargetKind, Transform};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Default, Deserialize)]
/// Top-level catalog document.
pub struct Catalog {
    #[serde(default, rename = "target")]
    pub targets: Vec<ConfigTarget>,
}

#[derive(Debug, Clone, Deserialize)]
/// One deployable unit: source artifact, destination path, and format.
pub struct ConfigTarget {
    /// Stable identifier, e.g. "claude-settings".
    pub name: String,
    /// Source path, relative to the catalog file's directory.
    pub source: String,
    /// Destination path on the host; `~` expands to the resolved home.
    pub dest: String,
    pub format: ConfigFormat,
    #[serde(default)]
    pub kind: TargetKind,
    #[serde(default)]
    pub severity: Severity,
    /// Optional rewrite applied on copy, e.g. `"mcp-to-opencode"`.
    #[serde(default)]
    pub transform: Option<Transform>,
}

#[derive(Debug)]
/// Fatal catalog-level problems. These abort the run before any install.
pub enum CatalogError {
    Unreadable { path: PathBuf, reason: String },
    Parse { path: PathBuf, reason: String },
    BadName { name: String },
    DuplicateName { name: String },
    IncompatibleTransform { name: String },
    DuplicateDestination {
        first: String,
        second: String,
        dest: PathBuf,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Unreadable { path, reason } => write!(
                f,
                "catalog not readable: {} ({})",
                path.to_string_lossy(),
                reason
            ),
            CatalogError::Parse { path, reason } => write!(
                f,
                "catalog is not valid TOML: {} ({})",
                path.to_string_lossy(),
                reason
            ),
            CatalogError::BadName { name } => write!(
                f,
                "invalid target name '{}' (expected lowercase letters, digits, '.', '_' or '-')",
                name
            ),
            CatalogError::DuplicateName { name } => {
                write!(f, "duplicate target name '{}'", name)
            }
            CatalogError::IncompatibleTransform { name } => write!(
                f,
                "target '{}' declares a transform but is not a single-file json target",
                name
            ),
            CatalogError::DuplicateDestination { first, second, dest } => write!(
                f,
                "targets '{}' and '{}' both declare destination {}",
                first,
                second,
                dest.to_string_lossy()
            ),
        }
    }
}

fn name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9._-]*$").expect("bad name regex"))
}

/// Load and validate the catalog file.
///
/// Validation covers authoring errors only (names, uniqueness); duplicate
/// destinations are checked by the orchestrator after path resolution, since
/// two distinct `dest` strings may expand to the same path.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let s = fs::read_to_string(path).map_err(|e| CatalogError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let catalog: Catalog = toml::from_str(&s).map_err(|e| CatalogError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
    for t in &catalog.targets {
        if !name_re().is_match(&t.name) {
            return Err(CatalogError::BadName {
                name: t.name.clone(),
            });
        }
        if !seen.insert(t.name.as_str()) {
            return Err(CatalogError::DuplicateName {
                name: t.name.clone(),
            });
        }
        // Transforms rewrite one JSON document; anything else is an
        // authoring error.
        if t.transform.is_some()
            && (t.format != ConfigFormat::Json || t.kind != TargetKind::File)
        {
            return Err(CatalogError::IncompatibleTransform {
                name: t.name.clone(),
            });
        }
    }
    Ok(catalog)
}
