use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Read-only access to the image and music directories.
///
/// The pipeline never touches the filesystem for inputs except through this trait, so callers can
/// substitute their own storage.
pub trait MediaCatalog: Send + Sync {
    /// Files directly inside `dir` whose extension is one of `extensions` (case-insensitive),
    /// sorted by file name. A missing directory lists as empty.
    fn list(&self, dir: &Path, extensions: &[String]) -> ReelResult<Vec<PathBuf>>;

    /// Return `true` when `path` names an existing regular file.
    fn exists(&self, path: &Path) -> bool;

    /// Read the full contents of `path`.
    fn read(&self, path: &Path) -> ReelResult<Vec<u8>>;
}

/// [`MediaCatalog`] backed by the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsCatalog;

impl MediaCatalog for FsCatalog {
    fn list(&self, dir: &Path, extensions: &[String]) -> ReelResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "media directory does not exist");
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("list media directory '{}'", dir.display()))?;

        let mut out = Vec::new();
        for entry in entries {
            let entry =
                entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
            let path = entry.path();
            if path.is_file() && has_extension(&path, extensions) {
                out.push(path);
            }
        }
        out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(out)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> ReelResult<Vec<u8>> {
        Ok(std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?)
    }
}

/// Case-insensitive extension match.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

/// Resolve a table reference against `dir`, refusing references that leave the directory.
pub fn resolve_in_dir(dir: &Path, reference: &str) -> ReelResult<PathBuf> {
    let norm = normalize_rel_path(reference)?;
    Ok(dir.join(Path::new(&norm)))
}

/// Normalize and validate a directory-relative file reference.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation("file references must be relative"));
    }
    if s.is_empty() {
        return Err(ReelError::validation("file reference must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation(
                "file references must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation(
            "file reference must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/catalog.rs"]
mod tests;
