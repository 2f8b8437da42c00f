//! Configuration file handling for finreport.
//!
//! The configuration file is optional. When present it is stored at `$FINREPORT_HOME/config.json`
//! and overrides where reports and logs are written, where the user settings live, and which
//! endpoint rates are fetched from.

use crate::rates::CBR_DAILY_URL;
use crate::reports::{ReportWriter, DATA_DIR};
use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use url::Url;

const APP_NAME: &str = "finreport";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const LOGS: &str = "logs";
const USER_SETTINGS_JSON: &str = "user_settings.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FINREPORT_HOME` and from there it loads `$FINREPORT_HOME/config.json` if it
/// exists. Relative paths in the file are resolved against the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    rates_url: Url,
}

impl Config {
    /// This will
    /// - validate that `home` exists
    /// - load the config file, or use the defaults when there is none
    /// - validate the rates URL
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The finreport home directory is missing")?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).await?
        } else {
            debug!(
                "No config file at '{}', using defaults",
                config_path.display()
            );
            ConfigFile::default()
        };

        let rates_url = Url::parse(config_file.rates_url())
            .with_context(|| format!("Invalid rates_url '{}'", config_file.rates_url()))?;

        Ok(Self {
            root,
            config_path,
            config_file,
            rates_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The directory reports are written to, `$FINREPORT_HOME/data` by default.
    pub fn data_dir(&self) -> PathBuf {
        self.resolve(self.config_file.data_dir())
    }

    /// The directory of the per-module log files, `$FINREPORT_HOME/logs` by default.
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(self.config_file.log_dir())
    }

    pub fn user_settings_path(&self) -> PathBuf {
        self.resolve(self.config_file.user_settings())
    }

    pub fn rates_url(&self) -> &Url {
        &self.rates_url
    }

    /// A `ReportWriter` that writes to `data_dir`.
    pub fn report_writer(&self) -> ReportWriter {
        ReportWriter::new(self.data_dir())
    }

    /// Loads the user settings file. See [`UserSettings::load`].
    pub async fn user_settings(&self) -> Option<UserSettings> {
        UserSettings::load(&self.user_settings_path()).await
    }

    /// Returns `p` unchanged if it is absolute, otherwise resolves it against the home directory.
    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file. Every field
/// but `app_name` and `config_version` may be omitted.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "finreport",
///   "config_version": 1,
///   "data_dir": "data",
///   "log_dir": "logs",
///   "rates_url": "https://cbr.ru/scripts/XML_daily.asp",
///   "user_settings": "user_settings.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "finreport"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Where reports are written (relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_dir: Option<PathBuf>,

    /// Where log files are written (relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_dir: Option<PathBuf>,

    /// The daily rates endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rates_url: Option<String>,

    /// Path to the user settings file (relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_settings: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            data_dir: None,
            log_dir: None,
            rates_url: None,
            user_settings: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Unable to load the config file")?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DATA_DIR))
    }

    fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| PathBuf::from(LOGS))
    }

    fn rates_url(&self) -> &str {
        self.rates_url.as_deref().unwrap_or(CBR_DAILY_URL)
    }

    fn user_settings(&self) -> PathBuf {
        self.user_settings
            .clone()
            .unwrap_or_else(|| PathBuf::from(USER_SETTINGS_JSON))
    }
}

/// The user's preferences, stored in `user_settings.json`:
/// ```json
/// { "user_currencies": ["USD", "EUR"], "user_stocks": ["AAPL", "AMZN"] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct UserSettings {
    #[serde(default)]
    user_currencies: Vec<String>,
    #[serde(default)]
    user_stocks: Vec<String>,
}

impl UserSettings {
    /// Loads the settings file at `path`. A missing or malformed file is logged and gives `None`.
    pub async fn load(path: &Path) -> Option<Self> {
        match utils::deserialize::<UserSettings>(path).await {
            Ok(settings) => {
                debug!("Loaded user settings from {}", path.display());
                Some(settings)
            }
            Err(e) => {
                error!("Unable to load user settings: {e:#}");
                None
            }
        }
    }

    /// Currency codes to report rates for, e.g. `USD`.
    pub fn user_currencies(&self) -> &[String] {
        &self.user_currencies
    }

    /// Stock tickers the user follows.
    pub fn user_stocks(&self) -> &[String] {
        &self.user_stocks
    }
}
