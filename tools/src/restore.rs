//! Backup directory to store.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use codec::{decode_document, CodecLimits, DecodeContext};
use store::{SetOptions, StoreHandle};
use tracing::{debug, info, warn};
use value::TaggedDocument;

use crate::filter::Exclusions;
use crate::layout::{scan_backup, BackupEntry};
use crate::report::RunReport;

/// Settings for [`restore_backup`].
#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    /// Merge into existing documents instead of replacing them.
    pub merge: bool,
    pub exclusions: Exclusions,
    pub limits: CodecLimits,
}

/// Loads one backed-up document file.
pub fn load_document(file: &Path) -> Result<TaggedDocument> {
    let text = fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {}", file.display()))
}

/// Restores every document found below `root` into `store`.
///
/// References are rebuilt against `store`, so a backup taken from one
/// database restores cleanly into another. A file that cannot be read or
/// parsed, or a `.json` file that matches no document, is recorded as a
/// failure and the walk goes on; a store write failure aborts the run.
pub fn restore_backup(
    root: &Path,
    store: &mut dyn StoreHandle,
    options: &RestoreOptions,
) -> Result<RunReport> {
    let scan = scan_backup(root, &options.exclusions)?;
    let mut report = RunReport {
        collections: scan.collections,
        ..RunReport::default()
    };
    for collection in &scan.skipped {
        info!(collection = %collection, "skipping excluded collection");
        report.skip(collection);
    }
    for file in &scan.unmatched {
        warn!(file = %file.display(), "file matches no document");
        report.fail(file, &anyhow!("not at <collection>/<id>/<id>.json"));
    }

    let set_options = SetOptions {
        merge: options.merge,
    };
    for BackupEntry { path, file } in &scan.documents {
        let doc = match load_document(file) {
            Ok(doc) => doc,
            Err(err) => {
                let message = format!("{err:#}");
                warn!(file = %file.display(), error = %message, "skipping unreadable file");
                report.fail(file, &err);
                continue;
            }
        };
        let decoded = {
            let ctx = DecodeContext::bound(&*store).with_limits(options.limits.clone());
            decode_document(&doc, &ctx)
        };
        report.record(path, &decoded.diagnostics);
        store
            .set_document(path, decoded.value, set_options)
            .with_context(|| format!("write document {path}"))?;
        debug!(document = %path, file = %file.display(), "document restored");
        report.documents += 1;
    }
    info!(
        documents = report.documents,
        failures = report.failures.len(),
        database = %store.database(),
        "restore finished"
    );
    Ok(report)
}
