//! Supporting helpers: stderr prefixes, tilde expansion, path display.

use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Colored `error:` prefix for stderr messages.
pub fn error_prefix() -> String {
    if colors_enabled() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

/// Colored `note:` prefix for stderr messages.
pub fn note_prefix() -> String {
    if colors_enabled() {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

/// Expand a leading `~` or `~/` against the resolved home directory.
///
/// Home resolution happens once, in config; this function never consults
/// the environment.
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return home.join(rest);
    }
    PathBuf::from(path)
}

/// Render a path relative to the working directory when that is shorter.
pub fn display_path(p: &Path) -> String {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match pathdiff::diff_paths(p, &cwd) {
        Some(rel) if rel.components().count() < p.components().count() => {
            rel.to_string_lossy().to_string()
        }
        _ => p.to_string_lossy().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_forms() {
        let home = Path::new("/home/u");
        assert_eq!(expand_tilde("~", home), PathBuf::from("/home/u"));
        assert_eq!(
            expand_tilde("~/.claude/settings.json", home),
            PathBuf::from("/home/u/.claude/settings.json")
        );
        assert_eq!(expand_tilde("/abs/path", home), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("rel/path", home), PathBuf::from("rel/path"));
        // '~user' forms are not expanded
        assert_eq!(expand_tilde("~other/x", home), PathBuf::from("~other/x"));
    }
}
