//! Per-edition monthly usage counters on disk
//!
//! File format is a flat JSON object keyed by `YYYY-MM`:
//!
//! ```json
//! {
//!   "2024-05": 12,
//!   "2024-06": 3
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use wpag_common::config::write_atomic;

use crate::license::edition::Edition;

/// Article counts keyed by period (`YYYY-MM`)
pub type UsageRecord = BTreeMap<String, u32>;

/// Location of one edition's usage file
#[derive(Debug, Clone)]
pub struct UsageStore {
    path: PathBuf,
}

impl UsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<root_folder>/usage_<edition>.json`
    pub fn for_edition(root_folder: &Path, edition: Edition) -> Self {
        Self::new(root_folder.join(format!("usage_{}.json", edition.as_str())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record; a missing, unreadable or corrupt file yields an empty one
    pub fn load(&self) -> UsageRecord {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No usage file yet");
                return UsageRecord::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read usage file, starting empty");
                return UsageRecord::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt usage file, starting empty");
                UsageRecord::new()
            }
        }
    }

    /// Replace the file with `record`
    pub fn save(&self, record: &UsageRecord) -> wpag_common::Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        write_atomic(&self.path, json.as_bytes())
    }
}
