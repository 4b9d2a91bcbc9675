//! On-disk layout of a backup.
//!
//! Every document gets a directory named after its id inside its
//! collection's directory, holding the document file and the directories of
//! its subcollections:
//!
//! ```text
//! <root>/users/alice/alice.json
//! <root>/users/alice/posts/p1/p1.json
//! ```
//!
//! A document directory may lack its `.json` file when the document itself
//! was never written. Any other `.json` file in the tree matches no document
//! and is reported by the scan.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;
use value::{CollectionPath, DocumentPath};

use crate::filter::Exclusions;

/// File extension of a backed-up document.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Returns the directory a collection's documents are written to.
#[must_use]
pub fn collection_dir(root: &Path, path: &CollectionPath) -> PathBuf {
    let mut dir = root.to_path_buf();
    dir.extend(path.segments());
    dir
}

/// Returns the file a document is backed up to.
#[must_use]
pub fn document_file(root: &Path, path: &DocumentPath) -> PathBuf {
    let id = path.id();
    collection_dir(root, &path.parent())
        .join(id)
        .join(document_file_name(id))
}

fn document_file_name(id: &str) -> String {
    format!("{id}.{DOCUMENT_EXTENSION}")
}

/// A document file found in a backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub path: DocumentPath,
    pub file: PathBuf,
}

/// Everything a walk over a backup directory found.
#[derive(Debug, Clone, Default)]
pub struct BackupScan {
    /// Document files, each document before its subcollections.
    pub documents: Vec<BackupEntry>,
    /// Number of collections walked.
    pub collections: usize,
    /// Collections left out by the exclusion patterns.
    pub skipped: Vec<CollectionPath>,
    /// `.json` files in a place no document is written to.
    pub unmatched: Vec<PathBuf>,
}

/// Walks a backup directory in sorted order.
pub fn scan_backup(root: &Path, exclusions: &Exclusions) -> Result<BackupScan> {
    if !root.is_dir() {
        return Err(anyhow!("backup root {} is not a directory", root.display()));
    }
    let mut scan = BackupScan::default();
    for (name, entry) in sorted_entries(root)? {
        if entry.is_dir() {
            scan_collection(&entry, &name, None, exclusions, &mut scan)?;
        } else {
            scan.stray(entry);
        }
    }
    Ok(scan)
}

impl BackupScan {
    fn stray(&mut self, file: PathBuf) {
        let name = file.file_name().and_then(|name| name.to_str()).unwrap_or_default();
        if document_id(name).is_some() {
            debug!(file = %file.display(), "document file outside its document directory");
            self.unmatched.push(file);
        } else {
            debug!(file = %file.display(), "ignoring non-document file");
        }
    }
}

/// Walks one collection directory: one directory per document.
fn scan_collection(
    dir: &Path,
    name: &str,
    parent: Option<&DocumentPath>,
    exclusions: &Exclusions,
    scan: &mut BackupScan,
) -> Result<()> {
    let collection = match parent {
        Some(parent) => parent.collection(name),
        None => CollectionPath::root(name),
    }
    .with_context(|| format!("collection directory {}", dir.display()))?;
    if exclusions.is_excluded(&collection) {
        scan.skipped.push(collection);
        return Ok(());
    }
    scan.collections += 1;

    for (id, entry) in sorted_entries(dir)? {
        if !entry.is_dir() {
            scan.stray(entry);
            continue;
        }
        let path = collection
            .doc(&id)
            .with_context(|| format!("document directory {}", entry.display()))?;
        scan_document(&entry, path, exclusions, scan)?;
    }
    Ok(())
}

/// Walks one document directory: its own file, then its subcollections.
fn scan_document(
    dir: &Path,
    path: DocumentPath,
    exclusions: &Exclusions,
    scan: &mut BackupScan,
) -> Result<()> {
    let own = document_file_name(path.id());
    let entries = sorted_entries(dir)?;
    if let Some((_, file)) = entries
        .iter()
        .find(|(name, entry)| *name == own && entry.is_file())
    {
        scan.documents.push(BackupEntry {
            path: path.clone(),
            file: file.clone(),
        });
    }
    for (name, entry) in entries {
        if entry.is_dir() {
            scan_collection(&entry, &name, Some(&path), exclusions, scan)?;
        } else if name != own {
            scan.stray(entry);
        }
    }
    Ok(())
}

fn document_id(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(DOCUMENT_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .filter(|id| !id.is_empty())
}

fn sorted_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("non UTF-8 file name {}", path.display()))?
            .to_string();
        entries.push((name, path));
    }
    entries.sort();
    Ok(entries)
}
