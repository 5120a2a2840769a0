//! One batch run: summarize every waiting record, back it up, import it,
//! and send the combined summary.
//!
//! A failure on one record is logged and reported in the email; the
//! remaining records are still processed.

use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::batch::traits::{Archiver, Importer, RecordSource};
use crate::config::ImportConfig;
use crate::edi::summarize_record;
use crate::error::Result;
use crate::notify::{Notification, Notifier};

/// Body of the operator email sent when a whole batch fails.
pub const BATCH_FAILURE_MESSAGE: &str =
    "There was an error with the EDI program. Please contact IT to correct.";

/// Collaborators used by a batch run.
pub struct BatchDeps {
    pub source: Arc<dyn RecordSource>,
    pub archiver: Arc<dyn Archiver>,
    /// `None` in found-only mode.
    pub importer: Option<Arc<dyn Importer>>,
    pub notifier: Arc<dyn Notifier>,
}

/// A record that could not be processed, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub processed: Vec<String>,
    pub failed: Vec<RecordFailure>,
    /// Body of the summary email; empty when no records were waiting.
    pub message: String,
    /// Whether the summary email was delivered.
    pub notified: bool,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty() && self.failed.is_empty()
    }
}

pub struct BatchImporter {
    config: ImportConfig,
    deps: BatchDeps,
}

impl BatchImporter {
    pub fn new(config: ImportConfig, deps: BatchDeps) -> Self {
        Self { config, deps }
    }

    /// Process every waiting record. `label` names the backup folder.
    ///
    /// Only a failure to list the source folder is returned as an error;
    /// per-record and notification failures end up in the report.
    pub fn run(&self, label: &str) -> Result<BatchReport> {
        let records = self.deps.source.list()?;
        if records.is_empty() {
            warn!("EDI records not found");
            return Ok(BatchReport::default());
        }
        info!(count = records.len(), "EDI records found");
        debug!(?records, "Records");

        let backup_folder = self.deps.archiver.prepare(label);
        let mut report = BatchReport::default();
        let mut message = self.config.preamble().to_string();

        for name in &records {
            info!(record = %name, "Processing record");
            match self.process_record(name, &backup_folder) {
                Ok(summary) => {
                    message.push_str(&summary);
                    report.processed.push(name.clone());
                    info!(record = %name, "Finished processing record");
                }
                Err(e) => {
                    error!(record = %name, error = %e, "Failed to process record");
                    report.failed.push(RecordFailure {
                        name: name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !report.failed.is_empty() {
            message.push_str("\n\nThe following EDI records could not be processed:");
            for failure in &report.failed {
                message.push_str(&format!("\n{}: {}", failure.name, failure.reason));
            }
        }

        report.notified = self.notify(&self.config.subject, &message);
        report.message = message;
        info!(
            processed = report.processed.len(),
            failed = report.failed.len(),
            "Batch finished"
        );
        Ok(report)
    }

    /// Read, summarize, back up and import one record.
    ///
    /// A record that cannot be summarized is left in the source folder.
    fn process_record(&self, name: &str, backup_folder: &Path) -> Result<String> {
        let text = self.deps.source.read(name)?;

        let summary = summarize_record(&text, &self.config.tokenizer(), self.config.style)?;
        debug!(
            record = %name,
            "Order information: {}",
            summary.trim().replace('\n', " ")
        );

        self.deps.archiver.backup(name, backup_folder)?;
        if let Some(importer) = &self.deps.importer {
            importer.import(name)?;
        }

        Ok(summary)
    }

    /// Send a notification. Failures are logged, never retried.
    fn notify(&self, subject: &str, body: &str) -> bool {
        let notification = Notification::new(&self.config.recipients, subject, body);
        match self.deps.notifier.send(&notification) {
            Ok(()) => {
                info!(notifier = self.deps.notifier.name(), "Notification sent");
                true
            }
            Err(e) => {
                error!(
                    notifier = self.deps.notifier.name(),
                    error = %e,
                    "Notification could not be sent. Body: {}",
                    notification.body
                );
                false
            }
        }
    }

    /// Tell operators the batch itself failed. Best effort.
    pub fn notify_failure(&self, err: &dyn Display) -> bool {
        let body = format!("{BATCH_FAILURE_MESSAGE}\nError:\n{err}");
        let subject = format!("{} (import failed)", self.config.subject);
        self.notify(&subject, &body)
    }
}
