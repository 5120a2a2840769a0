//! Collaborator traits for the batch importer.
//!
//! The importer only sees record names; where records live and how they are
//! copied is up to the implementation.

use std::path::{Path, PathBuf};

use crate::error::{ArchiveError, RecordError};

/// Where records come from.
pub trait RecordSource {
    /// Names of the records currently waiting.
    fn list(&self) -> Result<Vec<String>, RecordError>;

    /// Full text of one record.
    fn read(&self, name: &str) -> Result<String, RecordError>;
}

/// Keeps a dated copy of every processed record.
pub trait Archiver {
    /// Folder for this run's backups, created if needed.
    ///
    /// Creation failures (including an existing folder) are not fatal; the
    /// path is returned either way.
    fn prepare(&self, label: &str) -> PathBuf;

    /// Back up one record into `folder`.
    fn backup(&self, name: &str, folder: &Path) -> Result<(), ArchiveError>;
}

/// Hands records to the downstream system.
pub trait Importer {
    fn import(&self, name: &str) -> Result<(), ArchiveError>;
}
