//! Database identity and bound document references.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;
use crate::path::DocumentPath;

/// Id of the default database in a project.
pub const DEFAULT_DATABASE_ID: &str = "(default)";

/// Identifies one store instance: a project and a database within it.
///
/// References are only meaningful relative to a database, so every
/// [`DocumentRef`] carries the id of the store it was bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseId {
    pub project_id: String,
    pub database_id: String,
}

impl DatabaseId {
    #[must_use]
    pub fn new(project_id: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: database_id.into(),
        }
    }

    /// Creates the id of a project's default database.
    #[must_use]
    pub fn default_for(project_id: impl Into<String>) -> Self {
        Self::new(project_id, DEFAULT_DATABASE_ID)
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/databases/{}",
            self.project_id, self.database_id
        )
    }
}

impl FromStr for DatabaseId {
    type Err = ValueError;

    /// Parses `projects/<p>/databases/<d>`, or a bare project id for the default database.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::InvalidDatabaseName {
            name: s.to_string(),
        };
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            ["projects", project, "databases", database]
                if !project.is_empty() && !database.is_empty() =>
            {
                Ok(Self::new(*project, *database))
            }
            [project] if !project.is_empty() => Ok(Self::default_for(*project)),
            _ => Err(invalid()),
        }
    }
}

/// A reference to a document, bound to the database it resolves in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    pub database: DatabaseId,
    pub path: DocumentPath,
}

impl DocumentRef {
    #[must_use]
    pub const fn new(database: DatabaseId, path: DocumentPath) -> Self {
        Self { database, path }
    }

    /// Returns the reference with its path bound to another database.
    #[must_use]
    pub fn rebind(&self, database: DatabaseId) -> Self {
        Self {
            database,
            path: self.path.clone(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/documents/{}", self.database, self.path)
    }
}
