use std::fmt;
use std::path::PathBuf;

/// Receives `(done, total)` after every visited entry or restored record.
pub trait ProgressSink {
    fn report_progress(&mut self, done: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn report_progress(&mut self, done: usize, total: usize) {
        self(done, total)
    }
}

/// Receives every log line in the order operations happen.
pub trait LogSink {
    fn emit_log(&mut self, line: LogLine);
}

impl<F: FnMut(LogLine)> LogSink for F {
    fn emit_log(&mut self, line: LogLine) {
        self(line)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report_progress(&mut self, _done: usize, _total: usize) {}
}

/// Collects log lines in memory.
#[derive(Debug, Default, Clone)]
pub struct LogBuffer {
    pub lines: Vec<LogLine>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> usize {
        self.lines.iter().filter(|line| line.is_failure()).count()
    }
}

impl LogSink for LogBuffer {
    fn emit_log(&mut self, line: LogLine) {
        self.lines.push(line);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    /// A rename that would happen outside preview mode.
    Preview { from: PathBuf, to: PathBuf },
    Renamed { from: PathBuf, to: PathBuf },
    /// An entry that could not be renamed; it stays untouched and is not recorded.
    Failed {
        path: PathBuf,
        target: Option<PathBuf>,
        reason: String,
    },
    Restored { from: PathBuf, to: PathBuf },
    /// A ledger record whose renamed path no longer exists.
    NotFound { path: PathBuf },
    /// A ledger record that cannot drive a restore, e.g. an empty path field.
    InvalidRecord { index: usize, reason: String },
    RestoreFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },
}

impl LogLine {
    pub fn is_failure(&self) -> bool {
        matches!(self, LogLine::Failed { .. } | LogLine::RestoreFailed { .. })
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLine::Preview { from, to } => {
                write!(f, "Preview: {} -> {}", from.display(), to.display())
            }
            LogLine::Renamed { from, to } => {
                write!(f, "OK: {} -> {}", from.display(), to.display())
            }
            LogLine::Failed {
                path,
                target: Some(target),
                reason,
            } => write!(f, "Error: {} -> {} | {}", path.display(), target.display(), reason),
            LogLine::Failed {
                path,
                target: None,
                reason,
            } => write!(f, "Error: {} | {}", path.display(), reason),
            LogLine::Restored { from, to } => {
                write!(f, "Restored: {} -> {}", from.display(), to.display())
            }
            LogLine::NotFound { path } => write!(f, "Not found: {} (skipped)", path.display()),
            LogLine::InvalidRecord { index, reason } => {
                write!(f, "Invalid record #{}: {} (skipped)", index, reason)
            }
            LogLine::RestoreFailed { from, to, reason } => write!(
                f,
                "Restore error: {} -> {} | {}",
                from.display(),
                to.display(),
                reason
            ),
        }
    }
}
