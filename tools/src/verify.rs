//! Restore-then-re-encode check of a backup.

use std::path::Path;

use anyhow::{Context, Result};
use codec::encode_document_with_limits;
use serde::Serialize;
use store::{MemoryStore, StoreHandle};
use tracing::{info, warn};
use value::DatabaseId;

use crate::layout::scan_backup;
use crate::report::RunReport;
use crate::restore::{load_document, restore_backup, RestoreOptions};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub run: RunReport,
    /// Documents whose re-encoding differs from their file.
    pub mismatched: Vec<String>,
}

impl VerifyReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.run.is_clean() && self.mismatched.is_empty()
    }
}

/// Restores `root` into an in-memory store bound to `database` and checks
/// that encoding each restored document reproduces its file.
pub fn verify_backup(
    root: &Path,
    database: DatabaseId,
    options: &RestoreOptions,
) -> Result<VerifyReport> {
    let mut store = MemoryStore::new(database);
    let run = restore_backup(root, &mut store, options)?;
    let mut report = VerifyReport {
        run,
        mismatched: Vec::new(),
    };

    let scan = scan_backup(root, &options.exclusions)?;
    for entry in &scan.documents {
        if report.run.failures.iter().any(|failure| failure.file == entry.file) {
            continue;
        }
        let original = serde_json::to_value(load_document(&entry.file)?)
            .with_context(|| format!("re-read {}", entry.file.display()))?;
        let restored = store
            .get_document(&entry.path)
            .with_context(|| format!("read document {}", entry.path))?
            .unwrap_or_default();
        let encoded = encode_document_with_limits(&restored, &options.limits);
        let reencoded = serde_json::to_value(&encoded.value)
            .with_context(|| format!("re-encode {}", entry.path))?;
        if original != reencoded {
            warn!(document = %entry.path, "re-encoding differs from backup file");
            report.mismatched.push(entry.path.to_string());
        }
    }
    info!(
        documents = report.run.documents,
        mismatched = report.mismatched.len(),
        "verify finished"
    );
    Ok(report)
}

