//! Store to backup directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use codec::{encode_document_with_limits, CodecLimits};
use store::StoreHandle;
use tracing::{debug, info};
use value::DocumentPath;

use crate::filter::Exclusions;
use crate::layout::document_file;
use crate::output::{render_document, OutputFormat};
use crate::report::RunReport;

/// Settings for [`backup_store`].
#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
    pub format: OutputFormat,
    pub exclusions: Exclusions,
    pub limits: CodecLimits,
}

/// Writes every document of `store` below `root`, one file per document.
///
/// The walk is depth-first in store listing order: each document is written
/// before its subcollections are visited. Fields that cannot be encoded are
/// dropped from their document and listed in the report.
pub fn backup_store(
    store: &dyn StoreHandle,
    root: &Path,
    options: &BackupOptions,
) -> Result<RunReport> {
    fs::create_dir_all(root).with_context(|| format!("create backup root {}", root.display()))?;
    let mut backup = Backup {
        store,
        root,
        options,
        report: RunReport::default(),
    };
    backup.walk(None)?;
    info!(
        documents = backup.report.documents,
        collections = backup.report.collections,
        database = %store.database(),
        "backup finished"
    );
    Ok(backup.report)
}

struct Backup<'a> {
    store: &'a dyn StoreHandle,
    root: &'a Path,
    options: &'a BackupOptions,
    report: RunReport,
}

impl Backup<'_> {
    fn walk(&mut self, parent: Option<&DocumentPath>) -> Result<()> {
        let collections = self
            .store
            .list_collections(parent)
            .context("list collections")?;
        for collection in collections {
            if self.options.exclusions.is_excluded(&collection) {
                info!(collection = %collection, "skipping excluded collection");
                self.report.skip(&collection);
                continue;
            }
            info!(collection = %collection, "backing up collection");
            self.report.collections += 1;
            let documents = self
                .store
                .list_documents(&collection)
                .with_context(|| format!("list documents of {collection}"))?;
            for document in documents {
                self.write_document(&document)?;
                self.walk(Some(&document))?;
            }
        }
        Ok(())
    }

    fn write_document(&mut self, path: &DocumentPath) -> Result<()> {
        let Some(fields) = self
            .store
            .get_document(path)
            .with_context(|| format!("read document {path}"))?
        else {
            return Ok(());
        };
        let encoded = encode_document_with_limits(&fields, &self.options.limits);
        self.report.record(path, &encoded.diagnostics);

        let text = render_document(&encoded.value, self.options.format)
            .with_context(|| format!("render document {path}"))?;
        let file = document_file(self.root, path);
        if let Some(dir) = file.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
        }
        fs::write(&file, text).with_context(|| format!("write {}", file.display()))?;
        debug!(document = %path, file = %file.display(), "document written");
        self.report.documents += 1;
        Ok(())
    }
}
