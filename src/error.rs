//! Error types for the EDI importer.

use std::path::PathBuf;

/// Top-level error type for a batch run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Malformed segment conditions raised while summarizing a record.
///
/// Marker lookups (`CA`, `L`) never produce these; they fall back to a
/// placeholder instead.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Segment {tag} is missing field {index}")]
    MissingField { tag: String, index: usize },

    #[error("Address block for {name} needs two more segments, record ends after {available}")]
    TruncatedAddress { name: String, available: usize },

    #[error("Address segment {tag} is missing field {index}")]
    MalformedAddress { tag: String, index: usize },

    #[error("Malformed date {0:?}: expected 8 digits (YYYYMMDD)")]
    MalformedDate(String),
}

/// Failures retrieving records from the source folder.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Failed to list records in {path}: {source}")]
    Listing {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read record {name}: {source}")]
    Unreadable {
        name: String,
        source: std::io::Error,
    },
}

/// Backup and import file operation errors.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Failed to create backup folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Notification delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("No recipients configured")]
    NoRecipients,

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP send failed: {0}")]
    SendFailed(String),
}

/// Result type alias for the importer.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn ship_date(raw: &str) -> Result<String> {
        Ok(crate::edi::format_edi_date(raw)?)
    }

    #[test]
    fn parse_errors_convert_with_question_mark() {
        assert_eq!(ship_date("20240101").unwrap(), "2024-01-01");
        let err = ship_date("240101").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MalformedDate(ref raw)) if raw == "240101"));
        assert_eq!(
            err.to_string(),
            "Parse error: Malformed date \"240101\": expected 8 digits (YYYYMMDD)"
        );
    }

    #[test]
    fn archive_errors_keep_paths_in_message() {
        let err = Error::from(ArchiveError::Move {
            from: PathBuf::from("in/r.edi"),
            to: PathBuf::from("out/r.edi"),
            source: std::io::Error::other("disk full"),
        });
        assert_eq!(
            err.to_string(),
            "Archive error: Failed to move in/r.edi to out/r.edi: disk full"
        );
    }
}
