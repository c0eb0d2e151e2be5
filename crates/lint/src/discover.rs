//! Which files a run checks.

use crate::config::{LintConfig, LintError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolves the command-line target to a sorted list of files.
///
/// - `None`: every matching file under the corpus root.
/// - an existing file: that file, whatever its extension.
/// - an existing directory: every matching file under it.
/// - anything else: a fuzzy id, matched case-insensitively against the
///   stems of matching files under the corpus root.
pub fn discover(target: Option<&str>, config: &LintConfig) -> Result<Vec<PathBuf>, LintError> {
    let Some(target) = target else {
        return walk(&config.root, config);
    };

    let path = Path::new(target);
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if path.is_dir() {
        return walk(path, config);
    }

    let needle = target.to_lowercase();
    let mut files = walk(&config.root, config)?;
    files.retain(|file| {
        file.file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| stem.to_lowercase().contains(&needle))
    });
    log::debug!("Fuzzy id `{}` matched {} file(s)", target, files.len());
    Ok(files)
}

fn walk(dir: &Path, config: &LintConfig) -> Result<Vec<PathBuf>, LintError> {
    if !dir.is_dir() {
        log::warn!("Content directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && config.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
