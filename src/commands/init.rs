use crate::commands::Out;
use crate::model::Fixtures;
use crate::{Config, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Creates the bankist home directory with:
/// - a `config.json` that points at `accounts.json`
/// - an `accounts.json` holding the `fixtures` accounts, ready to be edited
///
/// # Arguments
/// - `bankist_home` - The directory to create, e.g. `$HOME/bankist`
/// - `fixtures` - The built-in account set to start the accounts file from.
///
/// # Errors
/// - Returns an error if any file operations fail, or if the directory is already initialized.
pub async fn init(bankist_home: &Path, fixtures: Fixtures) -> Result<Out<PathBuf>> {
    let config = Config::create(bankist_home, fixtures)
        .await
        .context("Unable to create the bankist directory and configs")?;
    let message = format!(
        "Successfully created the bankist directory at {}",
        config.root().display()
    );
    Ok(Out::new(message, config.config_path().to_path_buf()))
}
