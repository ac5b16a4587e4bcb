use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Pick the path `original` should be renamed to so that no distinct entry is overwritten.
///
/// Returns `desired` itself when it is free, or when it already denotes the same
/// entry as `original` (a no-op or case-only rename). Otherwise appends ` (N)`
/// before the extension, counting up from 1, until a free candidate is found.
pub fn resolve(original: &Path, desired: &Path) -> PathBuf {
    if absolute(original) == absolute(desired) {
        return desired.to_path_buf();
    }

    let mut candidate = desired.to_path_buf();
    let mut counter: u64 = 1;
    while exists(&candidate) {
        if is_same_entry(original, &candidate) {
            debug!("Target is the same entry as source: {:?}", candidate);
            return candidate;
        }
        candidate = with_suffix(desired, counter);
        trace!("Collision, trying: {:?}", candidate);
        counter += 1;
    }
    candidate
}

/// First free path among `path`, `path (1)`, `path (2)`, ...
pub fn unique_path(path: &Path) -> PathBuf {
    let mut candidate = path.to_path_buf();
    let mut counter: u64 = 1;
    while exists(&candidate) {
        candidate = with_suffix(path, counter);
        counter += 1;
    }
    candidate
}

/// Insert ` (N)` before the extension of the last path component.
///
/// - `"report.docx"` -> `"report (1).docx"`
/// - `"archive.tar.gz"` -> `"archive.tar (1).gz"`
/// - `".bashrc"` -> `".bashrc (1)"`
pub fn with_suffix(path: &Path, counter: u64) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();

    let mut name = stem;
    name.push(format!(" ({})", counter));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// Whether both paths refer to one underlying filesystem entry.
///
/// Any failure to query identity counts as "not the same".
pub fn is_same_entry(a: &Path, b: &Path) -> bool {
    match same_entry(a, b) {
        Ok(same) => same,
        Err(e) => {
            debug!("Identity check failed for {:?} and {:?}: {}", a, b, e);
            false
        }
    }
}

#[cfg(unix)]
fn same_entry(a: &Path, b: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let a = fs::symlink_metadata(long_path(a))?;
    let b = fs::symlink_metadata(long_path(b))?;
    Ok(a.dev() == b.dev() && a.ino() == b.ino())
}

#[cfg(not(unix))]
fn same_entry(a: &Path, b: &Path) -> io::Result<bool> {
    let a = fs::canonicalize(long_path(a))?;
    let b = fs::canonicalize(long_path(b))?;
    Ok(a == b)
}

/// Existence check that does not follow a final symlink, so dangling links still collide.
pub fn exists(path: &Path) -> bool {
    fs::symlink_metadata(long_path(path)).is_ok()
}

/// Rename at the filesystem-call boundary, applying the long-path shim.
pub fn rename_path(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(long_path(from), long_path(to))
}

fn absolute(path: &Path) -> Cow<'_, Path> {
    if path.is_absolute() {
        Cow::Borrowed(path)
    } else {
        std::path::absolute(path)
            .map(Cow::Owned)
            .unwrap_or(Cow::Borrowed(path))
    }
}

/// Windows paths of 260 characters or more go through the `\\?\` namespace.
#[cfg(windows)]
pub fn long_path(path: &Path) -> Cow<'_, Path> {
    const MAX_PATH: usize = 260;
    const VERBATIM: &str = r"\\?\";

    let abs = absolute(path);
    let too_long = {
        let text = abs.to_string_lossy();
        !text.starts_with(VERBATIM) && text.chars().count() >= MAX_PATH
    };
    if !too_long {
        return abs;
    }
    let mut prefixed = std::ffi::OsString::from(VERBATIM);
    prefixed.push(abs.as_os_str());
    Cow::Owned(PathBuf::from(prefixed))
}

#[cfg(not(windows))]
pub fn long_path(path: &Path) -> Cow<'_, Path> {
    Cow::Borrowed(path)
}
