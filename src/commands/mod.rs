//! Command handlers for the hbook CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod day;
mod init;
mod month;
mod register;

use crate::api::{self, Backend, Mode};
use crate::model::{MonthlyReceipt, YearMonth};
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use day::{day, DayView};
pub use init::init;
pub use month::{month, DaySummary, MonthView};
pub use register::{edit, no_spend, register};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data to the command line.
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

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
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

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
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

/// Creates the configured backend and the month snapshot `month` is edited against.
async fn open_month(
    config: &Config,
    mode: Mode,
    month: YearMonth,
) -> Result<(Box<dyn Backend + Send>, MonthlyReceipt)> {
    let mut backend = api::backend(config, mode)?;
    let records = backend
        .month(month)
        .await
        .with_context(|| format!("Unable to load the receipts of {month}"))?;
    debug!("Loaded {} registered day(s) for {month}", records.len());
    let monthly = MonthlyReceipt::from_records(month, &records)
        .with_context(|| format!("The backend returned a receipt outside of {month}"))?;
    Ok((backend, monthly))
}
