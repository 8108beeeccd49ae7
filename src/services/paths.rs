//! Path helpers shared by the scanner and the launcher.
//!
//! Joins are lexical: `.` and `..` are folded without touching the
//! filesystem, so derived paths do not depend on symlinks or on whether the
//! target exists yet.

use crate::error::ConfigError;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::sync::LazyLock;

static EDGE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[/\\]|[/\\]$").expect("Invalid edge separator regex"));

/// Strip one leading and one trailing path separator (`/` or `\`), if present.
pub fn normalize_separators(path: &str) -> String {
    EDGE_SEPARATOR.replace_all(path, "").into_owned()
}

/// [`normalize_separators`] for camino paths.
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(normalize_separators(path.as_str()))
}

/// Fold `.` and `..` components. A `..` at the root stays at the root; a
/// leading `..` in a relative path is kept.
pub fn clean(path: &Utf8Path) -> Utf8PathBuf {
    let mut parts: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match parts.last() {
                Some(Utf8Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return Utf8PathBuf::from(".");
    }
    parts.iter().map(|c| c.as_str()).collect()
}

/// Join `relative` onto `base` and clean the result. Leading separators on
/// `relative` are dropped, so `/abs/src` still lands below `base`.
pub fn lexical_join(base: &Utf8Path, relative: &str) -> Utf8PathBuf {
    clean(&base.join(relative.trim_start_matches(['/', '\\'])))
}

/// Resolve `path` against the current directory.
pub fn absolutize(path: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(clean(path));
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(ConfigError::NonUtf8Path)?;
    Ok(lexical_join(&cwd, path.as_str()))
}

/// Final segment of a declared path, accepting either separator and ignoring
/// trailing separators.
pub fn last_segment(declared: &str) -> &str {
    let trimmed = declared.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}
