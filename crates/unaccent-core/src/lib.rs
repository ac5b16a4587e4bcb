use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub mod ledger;
pub mod report;
pub mod resolver;
pub mod restore;
pub mod sanitizer;
pub mod walker;

pub use ledger::{Ledger, RenameRecord};
pub use report::{LogBuffer, LogLine, LogSink, NoProgress, ProgressSink};
pub use restore::RestoreResult;
pub use sanitizer::{sanitize, SanitizeConfig, Sanitizer};
pub use walker::{Mode, WalkResult};

#[derive(thiserror::Error, Debug)]
pub enum UnaccentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path error: {message}")]
    Path { message: String },
    #[error("Failed to read backup file {path:?}: {source}")]
    LedgerRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Backup file {path:?} is not a list of {{\"old\", \"new\"}} records: {message}")]
    LedgerParse { path: PathBuf, message: String },
    #[error("Failed to save backup file {path:?}: {message}")]
    LedgerWrite { path: PathBuf, message: String },
}

pub struct RenameOutcome {
    pub walk: WalkResult,
    /// Where the ledger was saved, when backup was enabled and something was renamed.
    pub backup_file: Option<PathBuf>,
    /// Set when the renames succeeded but the ledger could not be saved.
    pub backup_error: Option<UnaccentError>,
}

/// Report what `rename` would do without changing anything.
pub fn preview<P, L>(
    root: &Path,
    config: SanitizeConfig,
    progress: &mut P,
    log: &mut L,
) -> Result<WalkResult, UnaccentError>
where
    P: ProgressSink,
    L: LogSink,
{
    info!("Starting preview: {:?}", root);
    let sanitizer = Sanitizer::new(config);
    walker::run(root, Mode::Preview, &sanitizer, progress, log)
}

/// Sanitize every name below `root`, optionally saving a backup ledger inside `root`.
///
/// A failure to save the ledger does not undo the renames; it is returned in
/// [`RenameOutcome::backup_error`] alongside the completed walk.
pub fn rename<P, L>(
    root: &Path,
    config: SanitizeConfig,
    backup: bool,
    progress: &mut P,
    log: &mut L,
) -> Result<RenameOutcome, UnaccentError>
where
    P: ProgressSink,
    L: LogSink,
{
    let root = std::path::absolute(root)?;
    info!("Starting rename: {:?}", root);
    let sanitizer = Sanitizer::new(config);
    let walk = walker::run(&root, Mode::Rename, &sanitizer, progress, log)?;

    let mut outcome = RenameOutcome {
        walk,
        backup_file: None,
        backup_error: None,
    };

    if backup && !outcome.walk.ledger.is_empty() {
        outcome.save_backup(&root);
    }

    Ok(outcome)
}

impl RenameOutcome {
    fn save_backup(&mut self, directory: &Path) {
        match self.walk.ledger.persist(directory) {
            Ok(path) => self.backup_file = Some(path),
            Err(e) => {
                warn!("Could not save backup ledger: {}", e);
                self.backup_error = Some(e);
            }
        }
    }
}

/// Load a backup ledger and undo its renames.
///
/// A ledger that cannot be read or parsed aborts before anything is touched.
pub fn restore_from_file<P, L>(
    ledger_file: &Path,
    progress: &mut P,
    log: &mut L,
) -> Result<RestoreResult, UnaccentError>
where
    P: ProgressSink,
    L: LogSink,
{
    info!("Starting restore from: {:?}", ledger_file);
    let ledger = Ledger::load(ledger_file)?;
    Ok(restore::restore(&ledger, progress, log))
}
