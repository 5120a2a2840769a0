use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use edi_import::batch::{BatchDeps, BatchImporter, DirectoryStore, Importer};
use edi_import::config::{ImportConfig, run_label};
use edi_import::notify::{EmailConfig, LogNotifier, Notifier, SmtpNotifier};

fn main() -> anyhow::Result<ExitCode> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    let config = ImportConfig::from_env().context("Invalid configuration")?;
    let label = run_label(&chrono::Local::now());
    let _log_guard = init_tracing(&config, &label)?;

    info!(
        source = %config.source_dir.display(),
        archive = %config.archive_dir.display(),
        import = ?config.import_dir,
        layout = config.layout.as_str(),
        style = config.style.as_str(),
        "EDI import v{}",
        env!("CARGO_PKG_VERSION")
    );

    let mut store = DirectoryStore::new(&config.source_dir, &config.archive_dir)
        .with_backup_mode(config.backup_mode());
    if let Some(import_dir) = &config.import_dir {
        store = store.with_import_dir(import_dir);
    }
    let store = Arc::new(store);

    let notifier: Arc<dyn Notifier> = match EmailConfig::from_env() {
        Some(email_config) => {
            info!(smtp = %email_config.smtp_host, "Email: enabled");
            Arc::new(SmtpNotifier::new(email_config))
        }
        None => {
            warn!("SMTP_HOST not set, notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let importer = config
        .import_dir
        .is_some()
        .then(|| Arc::clone(&store) as Arc<dyn Importer>);

    let deps = BatchDeps {
        source: store.clone(),
        archiver: store,
        importer,
        notifier,
    };
    let batch = BatchImporter::new(config, deps);

    match batch.run(&label) {
        Ok(report) if report.is_empty() => {
            info!("Nothing to import. Closing...");
            Ok(ExitCode::SUCCESS)
        }
        Ok(report) => {
            info!(
                processed = report.processed.len(),
                failed = report.failed.len(),
                notified = report.notified,
                "Import finished. Closing..."
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(error = %e, "Import failed. Closing...");
            batch.notify_failure(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Log to stderr and to `<log_dir>/edi-import-log <label>.log`.
fn init_tracing(config: &ImportConfig, label: &str) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create log folder {}", config.log_dir.display()))?;

    let file_appender =
        tracing_appender::rolling::never(&config.log_dir, format!("edi-import-log {label}.log"));
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}
