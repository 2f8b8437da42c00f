//! Logging setup.
//!
//! Everything this crate logs goes to stderr. In addition, each functional area has its own log
//! file in the log directory: `reports.log` for the reports and `utils.log` for loading, rates and
//! the helpers they share. Log files are truncated when logging is initialized.
//!
//! Logging is installed for the current thread only and removed when its guard is dropped. The
//! binary runs on a current-thread runtime, so every event this crate emits is seen.

use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log file names and the module targets routed to each.
const MODULE_LOGS: &[(&str, &[&str])] = &[
    ("reports.log", &["finreport::reports"]),
    (
        "utils.log",
        &[
            "finreport::config",
            "finreport::import",
            "finreport::model",
            "finreport::rates",
        ],
    ),
];

/// Keeps logging installed. Dropping it removes the subscriber and closes the log files.
#[must_use = "logging is removed when the guard is dropped"]
pub struct LogGuard {
    _default: DefaultGuard,
}

impl std::fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogGuard").finish_non_exhaustive()
    }
}

/// Installs logging to stderr only. Used before the configuration, and with it the log directory,
/// is known.
pub fn init_stderr(level: LevelFilter) -> LogGuard {
    let subscriber = Registry::default().with(vec![stderr_layer(level)]);
    LogGuard {
        _default: tracing::subscriber::set_default(subscriber),
    }
}

/// Installs logging to stderr and to the per-module log files in `log_dir`, creating the
/// directory if needed.
///
/// The stderr filter comes from `RUST_LOG` when it is set, otherwise `level` applies to this
/// crate. The log files always use `level`.
pub fn init(level: LevelFilter, log_dir: &Path) -> Result<LogGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Unable to create the log directory {}", log_dir.display()))?;

    let mut layers = vec![stderr_layer(level)];
    for (file_name, targets) in MODULE_LOGS {
        let path = log_dir.join(file_name);
        let file = File::create(&path)
            .with_context(|| format!("Unable to create the log file {}", path.display()))?;
        let filter = targets
            .iter()
            .fold(Targets::new(), |filter, target| filter.with_target(*target, level));
        layers.push(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_filter(filter)
                .boxed(),
        );
    }

    let subscriber = Registry::default().with(layers);
    Ok(LogGuard {
        _default: tracing::subscriber::set_default(subscriber),
    })
}

fn stderr_layer(level: LevelFilter) -> BoxedLayer {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // Otherwise use the given level for this crate only.
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter)
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::get_date;
    use crate::reports::spending_by_category;
    use crate::test::food_transactions;
    use tempfile::TempDir;

    #[test]
    fn test_module_log_files() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");

        let guard = init(LevelFilter::DEBUG, &log_dir).unwrap();
        let _ = spending_by_category(&food_transactions(), "Food", Some("not a date"));
        assert!(get_date("31.02.2024").is_none());
        drop(guard);

        let reports = std::fs::read_to_string(log_dir.join("reports.log")).unwrap();
        let utils = std::fs::read_to_string(log_dir.join("utils.log")).unwrap();

        assert!(reports.contains("WARN"));
        assert!(reports.contains("finreport::reports::spending"));
        assert!(!reports.contains("finreport::model"));
        assert!(utils.contains("ERROR"));
        assert!(utils.contains("finreport::model::date"));
        assert!(!utils.contains("finreport::reports"));
        assert!(!reports.contains('\u{1b}'));
    }

    #[test]
    fn test_log_files_are_truncated() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("reports.log"), "stale line\n").unwrap();

        let guard = init(LevelFilter::INFO, dir.path()).unwrap();
        drop(guard);

        let reports = std::fs::read_to_string(dir.path().join("reports.log")).unwrap();
        assert!(!reports.contains("stale line"));
    }

    #[test]
    fn test_level_applies_to_files() {
        let dir = TempDir::new().unwrap();

        let guard = init(LevelFilter::ERROR, dir.path()).unwrap();
        let _ = spending_by_category(&food_transactions(), "Food", Some("not a date"));
        drop(guard);

        let reports = std::fs::read_to_string(dir.path().join("reports.log")).unwrap();
        assert!(reports.is_empty());
    }
}
