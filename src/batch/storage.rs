//! Filesystem-backed record source, archiver and importer.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::batch::traits::{Archiver, Importer, RecordSource};
use crate::error::{ArchiveError, RecordError};

/// How a record reaches the backup folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupMode {
    /// Leave the original in place (it is imported afterwards).
    Copy,
    /// Take the record out of the source folder.
    Move,
}

/// Records stored as files in a source folder.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    source_dir: PathBuf,
    archive_dir: PathBuf,
    import_dir: Option<PathBuf>,
    backup_mode: BackupMode,
}

impl DirectoryStore {
    pub fn new(source_dir: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            archive_dir: archive_dir.into(),
            import_dir: None,
            backup_mode: BackupMode::Move,
        }
    }

    pub fn with_import_dir(mut self, import_dir: impl Into<PathBuf>) -> Self {
        self.import_dir = Some(import_dir.into());
        self
    }

    pub fn with_backup_mode(mut self, mode: BackupMode) -> Self {
        self.backup_mode = mode;
        self
    }

    pub fn source_path(&self, name: &str) -> PathBuf {
        self.source_dir.join(name)
    }
}

impl RecordSource for DirectoryStore {
    /// Regular files in the source folder, sorted by name.
    fn list(&self) -> Result<Vec<String>, RecordError> {
        let listing_error = |source| RecordError::Listing {
            path: self.source_dir.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.source_dir).map_err(listing_error)? {
            let entry = entry.map_err(listing_error)?;
            let file_type = entry.file_type().map_err(listing_error)?;
            if file_type.is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String, RecordError> {
        let path = self.source_path(name);
        let bytes = fs::read(&path).map_err(|source| RecordError::Unreadable {
            name: name.to_string(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "Record opened");
        Ok(decode_record(bytes))
    }
}

impl Archiver for DirectoryStore {
    fn prepare(&self, label: &str) -> PathBuf {
        let folder = self.archive_dir.join(label);
        debug!(path = %folder.display(), "Current archive path");
        match create_backup_folder(&folder) {
            Ok(true) => info!(path = %folder.display(), "Created backup folder"),
            Ok(false) => info!(path = %folder.display(), "Reusing existing backup folder"),
            Err(e) => warn!("{e}"),
        }
        folder
    }

    fn backup(&self, name: &str, folder: &Path) -> Result<(), ArchiveError> {
        let from = self.source_path(name);
        let to = folder.join(name);
        info!(from = %from.display(), to = %to.display(), mode = ?self.backup_mode, "Backing up record");
        match self.backup_mode {
            BackupMode::Copy => copy_file(&from, &to),
            BackupMode::Move => move_file(&from, &to),
        }
    }
}

impl Importer for DirectoryStore {
    fn import(&self, name: &str) -> Result<(), ArchiveError> {
        let Some(import_dir) = &self.import_dir else {
            return Ok(());
        };
        let from = self.source_path(name);
        let to = import_dir.join(name);
        info!(from = %from.display(), to = %to.display(), "Importing record");
        move_file(&from, &to)
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Create `folder`. Returns `false` when it already existed.
pub fn create_backup_folder(folder: &Path) -> Result<bool, ArchiveError> {
    match fs::create_dir(folder) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && folder.is_dir() => Ok(false),
        Err(source) => Err(ArchiveError::CreateFolder {
            path: folder.to_path_buf(),
            source,
        }),
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<(), ArchiveError> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|source| ArchiveError::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
}

/// Rename, falling back to copy + remove when the rename fails (for
/// example across filesystems).
fn move_file(from: &Path, to: &Path) -> Result<(), ArchiveError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    let move_error = |source| ArchiveError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    fs::copy(from, to).map_err(move_error)?;
    fs::remove_file(from).map_err(move_error)
}

/// Windows-1252 characters for bytes `0x80..=0x9F`. The five bytes cp1252
/// leaves undefined map to the matching C1 control, like Latin-1.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Decode record bytes as UTF-8, falling back to Windows-1252. Byte `0x85`
/// is the ellipsis some feeds use as their continuation marker.
pub fn decode_record(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(cp1252_char).collect(),
    }
}

fn cp1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => CP1252_HIGH[usize::from(byte - 0x80)],
        _ => char::from(byte),
    }
}
