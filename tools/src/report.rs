//! Outcome of a backup, restore or verify run.

use std::fmt;
use std::path::{Path, PathBuf};

use codec::Diagnostic;
use serde::Serialize;
use value::{CollectionPath, DocumentPath};

/// A field dropped from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentDiagnostic {
    pub document: String,
    pub field: String,
    pub message: String,
}

/// A file that could not be processed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file: PathBuf,
    pub message: String,
}

/// Counts and problems collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub documents: usize,
    pub collections: usize,
    pub skipped_collections: Vec<String>,
    pub diagnostics: Vec<DocumentDiagnostic>,
    pub failures: Vec<FileFailure>,
}

impl RunReport {
    /// `true` when every document was processed with no field dropped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.failures.is_empty()
    }

    pub fn record(&mut self, document: &DocumentPath, diagnostics: &[Diagnostic]) {
        self.diagnostics
            .extend(diagnostics.iter().map(|diagnostic| DocumentDiagnostic {
                document: document.to_string(),
                field: diagnostic.field.to_string(),
                message: diagnostic.error.to_string(),
            }));
    }

    pub fn skip(&mut self, collection: &CollectionPath) {
        self.skipped_collections.push(collection.to_string());
    }

    pub fn fail(&mut self, file: &Path, error: &anyhow::Error) {
        self.failures.push(FileFailure {
            file: file.to_path_buf(),
            message: format!("{error:#}"),
        });
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "documents: {} collections: {} skipped: {}",
            self.documents,
            self.collections,
            self.skipped_collections.len()
        )?;
        for skipped in &self.skipped_collections {
            writeln!(f, "  skipped {skipped}")?;
        }
        if !self.diagnostics.is_empty() {
            writeln!(f, "dropped fields:")?;
            for diagnostic in &self.diagnostics {
                writeln!(
                    f,
                    "  {} {}: {}",
                    diagnostic.document, diagnostic.field, diagnostic.message
                )?;
            }
        }
        if !self.failures.is_empty() {
            writeln!(f, "failed files:")?;
            for failure in &self.failures {
                writeln!(f, "  {}: {}", failure.file.display(), failure.message)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::{CodecError, FieldPath};

    #[test]
    fn records_field_scoped_diagnostics() {
        let mut report = RunReport::default();
        let document = DocumentPath::parse("users/bob").unwrap();
        report.record(
            &document,
            &[Diagnostic {
                field: FieldPath::root().key("photo"),
                error: CodecError::UnsupportedType { kind: "bytes" },
            }],
        );
        assert!(!report.is_clean());
        assert_eq!(report.diagnostics[0].document, "users/bob");
        assert_eq!(report.diagnostics[0].field, "photo");
    }

    #[test]
    fn summary_lists_problems() {
        let mut report = RunReport {
            documents: 3,
            collections: 2,
            ..RunReport::default()
        };
        report.fail(Path::new("users/x.json"), &anyhow::anyhow!("bad json"));
        let text = report.to_string();
        assert!(text.starts_with("documents: 3 collections: 2 skipped: 0\n"));
        assert!(text.contains("users/x.json: bad json"));
    }
}
