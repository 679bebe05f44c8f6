//! Command handlers for the bankist CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod accounts;
mod init;
mod session;
mod summary;

use serde::Serialize;
use std::fmt::{Debug, Display};
use tracing::{debug, info};

pub use accounts::{accounts, AccountEntry, Listing};
pub use init::init;
pub use session::{apply, run, session, Outcome, SessionReport};
pub use summary::summary;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug + Display,
{
    /// Write the structured data (if it exists) in its human-readable form to stdout, then
    /// `print` as usual.
    pub fn show(&self) {
        if let Some(structure) = self.structure() {
            println!("{structure}");
        }
        self.print();
    }
}
