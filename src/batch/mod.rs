//! Batch import of EDI records from a source folder.

pub mod importer;
pub mod storage;
pub mod traits;

pub use importer::{BATCH_FAILURE_MESSAGE, BatchDeps, BatchImporter, BatchReport, RecordFailure};
pub use storage::{BackupMode, DirectoryStore};
pub use traits::{Archiver, Importer, RecordSource};
