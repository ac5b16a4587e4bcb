use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::resolver;
use crate::UnaccentError;

pub const BACKUP_FILE_PREFIX: &str = "rename_backup_";

/// One completed rename: `old` is the path before sanitization, `new` is where it now lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRecord {
    #[serde(rename = "old")]
    pub original_path: String,
    #[serde(rename = "new")]
    pub final_path: String,
}

impl RenameRecord {
    pub fn new(original_path: &Path, final_path: &Path) -> Self {
        Self {
            original_path: original_path.to_string_lossy().into_owned(),
            final_path: final_path.to_string_lossy().into_owned(),
        }
    }
}

/// Renames in the order they happened: descendants before their ancestor directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<RenameRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RenameRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[RenameRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write the ledger into `directory` under a fresh timestamped name and return its path.
    pub fn persist(&self, directory: &Path) -> Result<PathBuf, UnaccentError> {
        let json = self.to_json().map_err(|e| UnaccentError::LedgerWrite {
            path: directory.to_path_buf(),
            message: e.to_string(),
        })?;

        let path = resolver::unique_path(&directory.join(backup_file_name()));
        debug!("Writing {} ledger records to {:?}", self.len(), path);

        fs::write(resolver::long_path(&path), json).map_err(|e| UnaccentError::LedgerWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;

        info!("Saved backup ledger: {:?}", path);
        Ok(path)
    }

    pub fn load(path: &Path) -> Result<Self, UnaccentError> {
        let json = fs::read_to_string(resolver::long_path(path)).map_err(|source| {
            UnaccentError::LedgerRead {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let ledger = Self::from_json(&json).map_err(|e| UnaccentError::LedgerParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!("Loaded {} ledger records from {:?}", ledger.len(), path);
        Ok(ledger)
    }
}

impl FromIterator<RenameRecord> for Ledger {
    fn from_iter<I: IntoIterator<Item = RenameRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// `rename_backup_YYYYMMDD_HHMMSS.json`, in local time.
pub fn backup_file_name() -> String {
    format!(
        "{}{}.json",
        BACKUP_FILE_PREFIX,
        Local::now().format("%Y%m%d_%H%M%S")
    )
}
