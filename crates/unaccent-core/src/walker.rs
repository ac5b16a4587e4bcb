use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::ledger::{Ledger, RenameRecord};
use crate::report::{LogLine, LogSink, ProgressSink};
use crate::resolver;
use crate::sanitizer::Sanitizer;
use crate::UnaccentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Log what would change without touching the filesystem.
    Preview,
    Rename,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Default)]
pub struct WalkResult {
    pub ledger: Ledger,
    /// Entries whose sanitized name differs from their current name.
    pub changes: usize,
    pub renamed: usize,
    pub failed: usize,
    pub visited: usize,
}

/// Number of files and directories below `root`, at least 1.
///
/// Symlinks are counted but never followed; unreadable directories contribute nothing further.
pub fn count_entries(root: &Path) -> usize {
    fn count(dir: &Path) -> usize {
        let Ok(entries) = fs::read_dir(resolver::long_path(dir)) else {
            return 0;
        };
        entries
            .filter_map(Result::ok)
            .map(|entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if is_dir {
                    1 + count(&entry.path())
                } else {
                    1
                }
            })
            .sum()
    }
    count(root).max(1)
}

/// Visit every entry below `root` bottom-up and sanitize its name.
///
/// Within a directory, files are handled first, then each subdirectory's contents,
/// then the subdirectories themselves, so a directory is only renamed once nothing
/// below it still needs its old path. The root itself is never renamed.
///
/// A relative `root` is resolved against the current directory first, so every
/// logged path and ledger record is absolute.
pub fn run<P, L>(
    root: &Path,
    mode: Mode,
    sanitizer: &Sanitizer,
    progress: &mut P,
    log: &mut L,
) -> Result<WalkResult, UnaccentError>
where
    P: ProgressSink,
    L: LogSink,
{
    let root = std::path::absolute(root)?;
    if !root.is_dir() {
        return Err(UnaccentError::Path {
            message: format!("Target must be an existing directory: {:?}", root),
        });
    }

    let total = count_entries(&root);
    info!("Walking {:?} ({} entries, mode {:?})", root, total, mode);

    let mut walker = Walker {
        mode,
        sanitizer,
        progress,
        log,
        total,
        result: WalkResult::default(),
    };
    walker.walk_dir(&root, true)?;

    let result = walker.result;
    info!(
        "Walk complete: {} visited, {} changes, {} renamed, {} failed",
        result.visited, result.changes, result.renamed, result.failed
    );
    Ok(result)
}

struct Walker<'a, P, L> {
    mode: Mode,
    sanitizer: &'a Sanitizer,
    progress: &'a mut P,
    log: &'a mut L,
    total: usize,
    result: WalkResult,
}

impl<P: ProgressSink, L: LogSink> Walker<'_, P, L> {
    fn walk_dir(&mut self, dir: &Path, is_root: bool) -> Result<(), UnaccentError> {
        debug!("Processing directory: {:?}", dir);

        let entries = match fs::read_dir(resolver::long_path(dir)) {
            Ok(entries) => entries,
            Err(e) if is_root => return Err(e.into()),
            Err(e) => {
                self.fail(dir, None, format!("cannot read directory: {}", e));
                return Ok(());
            }
        };

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => {
                    let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                    if is_dir {
                        dirs.push(entry.path());
                    } else {
                        files.push(entry.path());
                    }
                }
                Err(e) => self.fail(dir, None, format!("cannot read entry: {}", e)),
            }
        }

        // Process files first
        for path in &files {
            self.visit(path, EntryKind::File);
        }

        // Then the contents of each subdirectory
        for path in &dirs {
            self.walk_dir(path, false)?;
        }

        // Finally the subdirectories themselves
        for path in &dirs {
            self.visit(path, EntryKind::Directory);
        }

        Ok(())
    }

    fn visit(&mut self, path: &Path, kind: EntryKind) {
        self.process_entry(path, kind);
        self.result.visited += 1;
        self.progress.report_progress(self.result.visited, self.total);
    }

    fn process_entry(&mut self, path: &Path, kind: EntryKind) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            self.fail(path, None, "name is not valid UTF-8".to_string());
            return;
        };

        let desired = self.sanitizer.sanitize(name);
        if desired == name {
            return;
        }
        self.result.changes += 1;

        if matches!(desired.as_str(), "" | "." | "..") {
            self.fail(
                path,
                None,
                format!("sanitized name {:?} is not a usable file name", desired),
            );
            return;
        }
        let desired_path = path.with_file_name(&desired);

        match self.mode {
            Mode::Preview => {
                debug!("Would rename {:?}: {:?} -> {:?}", kind, path, desired_path);
                self.log.emit_log(LogLine::Preview {
                    from: path.to_path_buf(),
                    to: desired_path,
                });
            }
            Mode::Rename => {
                if path.to_str().is_none() {
                    self.fail(path, Some(desired_path), "path is not valid UTF-8".to_string());
                    return;
                }
                match rename_entry(path, &desired_path) {
                    Ok(final_path) => {
                        debug!("Renamed {:?}: {:?} -> {:?}", kind, path, final_path);
                        self.result
                            .ledger
                            .push(RenameRecord::new(path, &final_path));
                        self.result.renamed += 1;
                        self.log.emit_log(LogLine::Renamed {
                            from: path.to_path_buf(),
                            to: final_path,
                        });
                    }
                    Err(e) => self.fail(path, Some(desired_path), e.to_string()),
                }
            }
        }
    }

    fn fail(&mut self, path: &Path, target: Option<PathBuf>, reason: String) {
        debug!("Failed: {:?} | {}", path, reason);
        self.result.failed += 1;
        self.log.emit_log(LogLine::Failed {
            path: path.to_path_buf(),
            target,
            reason,
        });
    }
}

/// Resolve collisions for `desired` and move `path` there, returning where it landed.
///
/// Renaming one hard link onto another link of the same file succeeds without
/// moving anything; that case is reported as an error so it is never recorded.
pub fn rename_entry(path: &Path, desired: &Path) -> io::Result<PathBuf> {
    let final_path = resolver::resolve(path, desired);
    if final_path != path {
        resolver::rename_path(path, &final_path)?;
        if resolver::exists(path) && !differs_only_in_case(path, &final_path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{:?} is a hard link to the same file; nothing was moved", final_path),
            ));
        }
    }
    Ok(final_path)
}

// On case-insensitive stores the old spelling still resolves after a case-only rename.
fn differs_only_in_case(a: &Path, b: &Path) -> bool {
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}
