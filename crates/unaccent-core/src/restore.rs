use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::ledger::Ledger;
use crate::report::{LogLine, LogSink, ProgressSink};
use crate::resolver;
use crate::walker::rename_entry;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RestoreResult {
    pub restored: usize,
    pub not_found: usize,
    pub invalid: usize,
    pub failed: usize,
}

/// Undo every rename in `ledger`, most recent first.
///
/// The forward pass renamed bottom-up, so walking the ledger backwards restores
/// parents before the children nested under their original names. Records whose
/// renamed path is gone are skipped; an occupied original location gets a
/// ` (N)` suffix instead of being overwritten.
pub fn restore<P, L>(ledger: &Ledger, progress: &mut P, log: &mut L) -> RestoreResult
where
    P: ProgressSink,
    L: LogSink,
{
    let total = ledger.len().max(1);
    let mut result = RestoreResult::default();
    info!("Restoring {} ledger records", ledger.len());

    for (done, (index, record)) in ledger.records().iter().enumerate().rev().enumerate() {
        if record.original_path.is_empty() || record.final_path.is_empty() {
            debug!("Skipping ledger record #{} with an empty path", index);
            result.invalid += 1;
            log.emit_log(LogLine::InvalidRecord {
                index,
                reason: "empty \"old\" or \"new\" path".to_string(),
            });
        } else {
            let current = Path::new(&record.final_path);
            let original = Path::new(&record.original_path);
            restore_one(current, original, &mut result, log);
        }
        progress.report_progress(done + 1, total);
    }

    info!(
        "Restore complete: {} restored, {} not found, {} invalid, {} failed",
        result.restored, result.not_found, result.invalid, result.failed
    );
    result
}

fn restore_one<L: LogSink>(current: &Path, original: &Path, result: &mut RestoreResult, log: &mut L) {
    if !resolver::exists(current) {
        debug!("Not found, skipped: {:?}", current);
        result.not_found += 1;
        log.emit_log(LogLine::NotFound {
            path: current.to_path_buf(),
        });
        return;
    }

    match rename_entry(current, original) {
        Ok(final_path) => {
            debug!("Restored: {:?} -> {:?}", current, final_path);
            result.restored += 1;
            log.emit_log(LogLine::Restored {
                from: current.to_path_buf(),
                to: final_path,
            });
        }
        Err(e) => {
            debug!("Restore failed: {:?} -> {:?} | {}", current, original, e);
            result.failed += 1;
            log.emit_log(LogLine::RestoreFailed {
                from: current.to_path_buf(),
                to: PathBuf::from(original),
                reason: e.to_string(),
            });
        }
    }
}
