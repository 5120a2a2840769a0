//! Configuration types.

use std::path::PathBuf;

use chrono::{DateTime, TimeZone};

use crate::batch::storage::BackupMode;
use crate::edi::{RecordLayout, ReportStyle, Tokenizer};
use crate::error::ConfigError;

/// Subject of the batch summary email when none is configured.
pub const DEFAULT_SUBJECT: &str = "New EDI Records";

/// Format of the run label naming backup folders and log files.
pub const RUN_LABEL_FORMAT: &str = "%m-%d-%y %H.%M";

/// Batch import configuration.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Folder new records arrive in.
    pub source_dir: PathBuf,
    /// Root under which a dated backup folder is created per run.
    pub archive_dir: PathBuf,
    /// Folder the downstream system picks records up from. `None` means
    /// records are only reported and moved to the backup folder.
    pub import_dir: Option<PathBuf>,
    pub layout: RecordLayout,
    pub continuation_marker: Option<String>,
    pub style: ReportStyle,
    /// Summary email recipients.
    pub recipients: Vec<String>,
    pub subject: String,
    pub log_dir: PathBuf,
}

impl ImportConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| ConfigError::MissingEnvVar(key.into()));

        let source_dir = PathBuf::from(required("EDI_SOURCE_DIR")?);
        let archive_dir = PathBuf::from(required("EDI_ARCHIVE_DIR")?);
        let import_dir = var("EDI_IMPORT_DIR").map(PathBuf::from);

        let layout = match var("EDI_RECORD_LAYOUT") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "EDI_RECORD_LAYOUT".into(),
                message,
            })?,
            None => RecordLayout::default(),
        };

        let style = match var("EDI_REPORT_STYLE") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "EDI_REPORT_STYLE".into(),
                message,
            })?,
            None => ReportStyle::default(),
        };

        let recipients: Vec<String> = var("EDI_NOTIFY_RECIPIENTS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            source_dir,
            archive_dir,
            import_dir,
            layout,
            continuation_marker: var("EDI_CONTINUATION_MARKER"),
            style,
            recipients,
            subject: var("EDI_NOTIFY_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            log_dir: var("EDI_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
        })
    }

    pub fn tokenizer(&self) -> Tokenizer {
        let tokenizer = Tokenizer::new(self.layout);
        match &self.continuation_marker {
            Some(marker) => tokenizer.with_marker(marker.as_str()),
            None => tokenizer,
        }
    }

    /// Records are copied to the backup folder when they are also imported,
    /// moved there otherwise.
    pub fn backup_mode(&self) -> BackupMode {
        if self.import_dir.is_some() {
            BackupMode::Copy
        } else {
            BackupMode::Move
        }
    }

    /// First line of the summary email.
    pub fn preamble(&self) -> &'static str {
        if self.import_dir.is_some() {
            "The following EDI records were imported:"
        } else {
            "The following EDI records were found:"
        }
    }
}

/// Label for a run started at `now`, e.g. `01-15-24 09.30`.
pub fn run_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(RUN_LABEL_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{NaiveDate, Utc};

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("EDI_SOURCE_DIR", "/edi/in"),
        ("EDI_ARCHIVE_DIR", "/edi/archive"),
    ];

    #[test]
    fn minimal_config_defaults() {
        let config = ImportConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("/edi/in"));
        assert_eq!(config.archive_dir, PathBuf::from("/edi/archive"));
        assert!(config.import_dir.is_none());
        assert_eq!(config.layout, RecordLayout::Auto);
        assert_eq!(config.style, ReportStyle::Tender);
        assert!(config.recipients.is_empty());
        assert_eq!(config.subject, DEFAULT_SUBJECT);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.backup_mode(), BackupMode::Move);
        assert_eq!(config.preamble(), "The following EDI records were found:");
    }

    #[test]
    fn missing_source_dir() {
        let result = ImportConfig::from_lookup(lookup(&[("EDI_ARCHIVE_DIR", "/a")]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingEnvVar(ref key)) if key == "EDI_SOURCE_DIR"
        ));
    }

    #[test]
    fn blank_required_value_is_missing() {
        let result = ImportConfig::from_lookup(lookup(&[
            ("EDI_SOURCE_DIR", "/in"),
            ("EDI_ARCHIVE_DIR", "   "),
        ]));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn import_mode_copies_backups() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("EDI_IMPORT_DIR", "/abacus/edi"));
        let config = ImportConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.import_dir, Some(PathBuf::from("/abacus/edi")));
        assert_eq!(config.backup_mode(), BackupMode::Copy);
        assert_eq!(config.preamble(), "The following EDI records were imported:");
    }

    #[test]
    fn recipients_are_split_and_trimmed() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("EDI_NOTIFY_RECIPIENTS", "a@x.com, b@x.com,,  "));
        let config = ImportConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.recipients, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn layout_style_and_marker() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("EDI_RECORD_LAYOUT", "continuation"),
            ("EDI_CONTINUATION_MARKER", "||"),
            ("EDI_REPORT_STYLE", "consignee"),
            ("EDI_NOTIFY_SUBJECT", "New Mars EDI Records"),
        ]);
        let config = ImportConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.layout, RecordLayout::Continuation);
        assert_eq!(config.style, ReportStyle::Consignee);
        assert_eq!(config.subject, "New Mars EDI Records");
        assert_eq!(config.tokenizer().marker(), "||");
    }

    #[test]
    fn invalid_layout_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("EDI_RECORD_LAYOUT", "xml"));
        let result = ImportConfig::from_lookup(lookup(&vars));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "EDI_RECORD_LAYOUT"
        ));
    }

    #[test]
    fn run_label_format() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            .and_utc();
        assert_eq!(run_label(&now), "01-15-24 09.30");
        assert!(!run_label(&Utc::now()).is_empty());
    }
}
