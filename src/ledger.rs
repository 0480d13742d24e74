use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Sidecar filename; one ledger per source folder.
pub const LEDGER_FILE: &str = ".used_files.json";

/// On-disk shape: a flat JSON array of filename strings. Order is not
/// meaningful and duplicates must be tolerated by readers.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SidecarEntries(Vec<String>);

/// Set of source filenames that have already produced at least one saved
/// clip. Pure set: no counts, no timestamps, no ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsedFileLedger {
    used: HashSet<String>,
}

impl UsedFileLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the sidecar from `folder`. Missing or unparsable files yield an
    /// empty ledger; losing used-file tracking is non-critical bookkeeping
    /// and never surfaces as an error. Duplicate entries are collapsed.
    pub fn load(folder: &Path) -> Self {
        let path = folder.join(LEDGER_FILE);
        let entries: SidecarEntries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        Self {
            used: entries.0.into_iter().collect(),
        }
    }

    /// Persist the set to the sidecar, overwriting it. Order is not
    /// meaningful; entries are sorted only to keep the file diffable.
    pub fn save(&self, folder: &Path) -> std::io::Result<()> {
        let mut names: Vec<String> = self.used.iter().cloned().collect();
        names.sort_unstable();
        let text = serde_json::to_string(&SidecarEntries(names))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(folder.join(LEDGER_FILE), text)
    }

    /// Insert `filename`; returns true when it was newly added. Idempotent.
    pub fn mark_used(&mut self, filename: &str) -> bool {
        self.used.insert(filename.to_string())
    }

    pub fn is_used(&self, filename: &str) -> bool {
        self.used.contains(filename)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
