//! Configuration discovery and effective settings resolution.
//!
//! Dotsmith reads `dotsmith.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `catalog`: none (must be configured via flag or file)
//! - `output`: `human`
//! - `jobs`: number of catalog entries, capped by the orchestrator
//! - `dest_root`: the repository root (relative destinations join it)
//! - `home`: `$HOME`, used only for `~` expansion in destinations
//!
//! Overrides precedence: CLI > config file > defaults. Everything path-like
//! is resolved here once and threaded through the components; no component
//! reads ambient state (cwd, env) on its own.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Install-related configuration section under `[install]`.
pub struct InstallCfg {
    pub dry_run: Option<bool>,
    pub jobs: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `dotsmith.toml|yaml`.
pub struct DotsmithConfig {
    pub catalog: Option<String>,
    pub dest_root: Option<String>,
    /// Home directory override for `~` expansion (mainly for tests).
    pub home: Option<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub install: Option<InstallCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub catalog: String,
    pub catalog_configured: bool,
    pub dest_root: PathBuf,
    pub home: PathBuf,
    pub output: String,
    pub dry_run: bool,
    pub jobs: Option<usize>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `dotsmith.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("dotsmith.toml").exists()
            || cur.join("dotsmith.yaml").exists()
            || cur.join("dotsmith.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `DotsmithConfig` from `dotsmith.toml` or `dotsmith.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<DotsmithConfig> {
    let toml_path = root.join("dotsmith.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: DotsmithConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["dotsmith.yaml", "dotsmith.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: DotsmithConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_catalog: Option<&str>,
    cli_dest_root: Option<&str>,
    cli_output: Option<&str>,
    cli_dry_run: Option<bool>,
    cli_jobs: Option<usize>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let catalog_src = cli_catalog.map(|s| s.to_string()).or(cfg.catalog);
    let (catalog, catalog_configured) = match catalog_src {
        Some(s) => (s, true),
        None => (String::new(), false),
    };

    let dest_root = cli_dest_root
        .map(|s| s.to_string())
        .or(cfg.dest_root)
        .map(PathBuf::from)
        .map(|p| if p.is_absolute() { p } else { repo_root.join(p) })
        .unwrap_or_else(|| repo_root.clone());

    let home = cfg
        .home
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(PathBuf::from))
        .unwrap_or_else(|| repo_root.clone());

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let dry_run = cli_dry_run
        .or_else(|| cfg.install.as_ref().and_then(|i| i.dry_run))
        .unwrap_or(false);
    let jobs = cli_jobs.or_else(|| cfg.install.as_ref().and_then(|i| i.jobs));

    Effective {
        repo_root,
        catalog,
        catalog_configured,
        dest_root,
        home,
        output,
        dry_run,
        jobs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("dotsmith.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
catalog = "configs/catalog.toml"
output = "json"
[install]
dry_run = true
"#
        )
        .unwrap();

        // Resolve using explicit repo_root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None, None, None, None);
        assert_eq!(eff.catalog, "configs/catalog.toml");
        assert!(eff.catalog_configured);
        assert_eq!(eff.output, "json");
        assert!(eff.dry_run);
        assert_eq!(eff.dest_root, root);
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("dotsmith.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
catalog: catalog.toml
dest_root: deployed
"#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None, None, None);
        assert_eq!(eff.catalog, "catalog.toml");
        assert_eq!(eff.output, "human");
        assert!(!eff.dry_run);
        // relative dest_root joins the repo root
        assert_eq!(eff.dest_root, root.join("deployed"));
    }

    #[test]
    fn test_cli_precedence_over_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("dotsmith.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
catalog = "configs/catalog.toml"
output = "json"
[install]
dry_run = true
jobs = 2
"#
        )
        .unwrap();

        let eff = resolve_effective(
            root.to_str(),
            Some("other/catalog.toml"),
            None,
            Some("human"),
            Some(false),
            Some(4),
        );
        assert_eq!(eff.catalog, "other/catalog.toml");
        assert_eq!(eff.output, "human");
        assert!(!eff.dry_run);
        assert_eq!(eff.jobs, Some(4));
    }

    #[test]
    fn test_catalog_unconfigured_without_flag_or_file() {
        let dir = tempdir().unwrap();
        let eff = resolve_effective(dir.path().to_str(), None, None, None, None, None);
        assert!(!eff.catalog_configured);
    }

    #[test]
    fn test_home_override_from_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("dotsmith.toml")).unwrap();
        writeln!(f, "{}", r#"home = "/tmp/fakehome""#).unwrap();
        let eff = resolve_effective(root.to_str(), None, None, None, None, None);
        assert_eq!(eff.home, PathBuf::from("/tmp/fakehome"));
    }
}
