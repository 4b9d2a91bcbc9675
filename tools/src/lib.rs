//! Backup, restore and inspection tools for docvault.
//!
//! This crate drives the codec over a whole store:
//!
//! - Back up a store to a directory tree, one JSON file per document
//! - Restore a backup into a store, rebinding references to it
//! - Verify that a backup survives a restore and re-encode unchanged
//! - Inspect the tag tree of a backed-up document
//!
//! # Design Principles
//!
//! - **Sequential** - One document at a time, in a deterministic order.
//! - **Keep going** - A bad field or a corrupt file is reported, not fatal.

pub mod backup;
pub mod filter;
pub mod inspect;
pub mod layout;
pub mod output;
pub mod report;
pub mod restore;
pub mod verify;

pub use backup::{backup_store, BackupOptions};
pub use filter::Exclusions;
pub use inspect::{format_inspect_pretty, summarize, FieldSummary, InspectReport};
pub use layout::{document_file, scan_backup, BackupEntry, BackupScan};
pub use output::{render_document, OutputFormat};
pub use report::{DocumentDiagnostic, FileFailure, RunReport};
pub use restore::{load_document, restore_backup, RestoreOptions};
pub use verify::{verify_backup, VerifyReport};
