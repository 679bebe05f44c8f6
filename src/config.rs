//! Configuration file handling for Bankist.
//!
//! The configuration file is stored at `$BANKIST_HOME/config.json`. It selects the built-in
//! fixture set or points at a JSON file of accounts to start the bank with. The file is optional:
//! without it the built-in dated fixtures are used.

use crate::model::{AccountRecord, Bank, Fixtures};
use crate::{utils, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_NAME: &str = "bankist";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const ACCOUNTS_JSON: &str = "accounts.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BANKIST_HOME` and from there it loads `$BANKIST_HOME/config.json` if it exists.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and:
    /// - writes the accounts of `fixtures` to `accounts.json` so they can be edited
    /// - writes an initial `config.json` that points at `accounts.json`
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    /// - Returns an error if a `config.json` already exists in `dir`.
    pub async fn create(dir: impl Into<PathBuf>, fixtures: Fixtures) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the bankist home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        anyhow::ensure!(
            !config_path.exists(),
            "A config file already exists at '{}'",
            config_path.display()
        );

        let records = fixtures.records()?;
        let json = serde_json::to_string_pretty(&records).context("Unable to serialize accounts")?;
        utils::write(root.join(ACCOUNTS_JSON), json).await?;

        let config_file = ConfigFile {
            accounts_path: Some(PathBuf::from(ACCOUNTS_JSON)),
            fixtures,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// Loads `$BANKIST_HOME/config.json`, or falls back to the default configuration when
    /// the file (or the whole directory) does not exist.
    pub async fn load(bankist_home: impl Into<PathBuf>) -> Result<Self> {
        let root = bankist_home.into();
        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).await?
        } else {
            info!(
                "No config file at '{}', using the built-in accounts",
                config_path.display()
            );
            ConfigFile::default()
        };
        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn fixtures(&self) -> Fixtures {
        self.config_file.fixtures
    }

    /// The accounts file, if one is configured. A relative path is resolved against the home
    /// directory.
    pub fn accounts_path(&self) -> Option<PathBuf> {
        self.config_file.accounts_path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.root.join(p)
            }
        })
    }

    /// Opens a fresh bank from the accounts file, or from the built-in fixtures when there is
    /// none. Nothing is ever written back, so every call starts from the same data.
    pub async fn bank(&self) -> Result<Bank> {
        match self.accounts_path() {
            Some(path) => {
                debug!("Loading accounts from {}", path.display());
                let records: Vec<AccountRecord> = utils::deserialize(&path).await?;
                Bank::from_records(records)
                    .with_context(|| format!("Invalid accounts in {}", path.display()))
            }
            None => {
                debug!("Loading the {} fixtures", self.fixtures());
                self.fixtures().bank()
            }
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "bankist",
///   "config_version": 1,
///   "fixtures": "dated",
///   "accounts_path": "accounts.json"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "bankist"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The built-in accounts to use when `accounts_path` is not set
    #[serde(default)]
    fixtures: Fixtures,

    /// Path to a JSON array of accounts (optional, relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    accounts_path: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            fixtures: Fixtures::default(),
            accounts_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
