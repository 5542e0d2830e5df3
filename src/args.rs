//! These structs provide the CLI interface for the hbook CLI.

use crate::model::{Locale, ReceiptLine, YearMonth};
use crate::validate::UnfilledPolicy;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// hbook: A household book for your daily receipts.
///
/// Receipts are entered per day, as a list of stores and what was paid at each, and are shown on
/// a monthly calendar. A day is checked before it is registered with the backend: every line
/// needs a store name and a non-zero cost, and the same store may not appear twice with
/// different costs.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/household-book, pass --hbook-home if you want it somewhere else.
    Init(InitArgs),
    /// Show a month as a calendar with the total spent on each registered day.
    Month(MonthArgs),
    /// Show the receipt lines registered for one day.
    Day(DayArgs),
    /// Register the receipt of a day, replacing whatever was registered before.
    Register(RegisterArgs),
    /// Change the registered receipt of a day by removing and adding lines.
    Edit(EditArgs),
    /// Register a day on which nothing was bought.
    NoSpend(DayArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the configuration is held. Defaults to ~/household-book
    #[arg(long, env = "HBOOK_HOME", default_value_t = default_hbook_home())]
    hbook_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, hbook_home: PathBuf) -> Self {
        Self {
            log_level,
            hbook_home: hbook_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn hbook_home(&self) -> &DisplayPath {
        &self.hbook_home
    }
}

/// Args for the `hbook init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the receipt backend, e.g. https://example.com/rest/v1
    #[arg(long)]
    backend_url: String,

    /// Sent to the backend in the `apikey` header.
    #[arg(long)]
    api_key: Option<String>,

    /// How months are labelled: ja or en
    #[arg(long, default_value_t = Locale::default())]
    locale: Locale,

    /// What to do with a line that has no cost: reject or submit_as_zero
    #[arg(long, default_value_t = UnfilledPolicy::default())]
    unfilled_policy: UnfilledPolicy,
}

impl InitArgs {
    pub fn new(backend_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            api_key,
            locale: Locale::default(),
            unfilled_policy: UnfilledPolicy::default(),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn unfilled_policy(&self) -> UnfilledPolicy {
        self.unfilled_policy
    }
}

/// Args for the `hbook month` command.
#[derive(Debug, Parser, Clone)]
pub struct MonthArgs {
    /// The month to show as YYYY-MM. Defaults to the current month.
    month: Option<YearMonth>,
}

impl MonthArgs {
    pub fn new(month: Option<YearMonth>) -> Self {
        Self { month }
    }

    pub fn month(&self) -> Option<YearMonth> {
        self.month
    }
}

/// Args for commands that address a single day.
#[derive(Debug, Parser, Clone)]
pub struct DayArgs {
    /// The date as YYYY-MM-DD.
    date: NaiveDate,
}

impl DayArgs {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Args for the `hbook register` command.
#[derive(Debug, Parser, Clone)]
pub struct RegisterArgs {
    /// The date as YYYY-MM-DD.
    date: NaiveDate,

    /// A purchase as STORE=COST, e.g. --line 'Life Supermarket=2380'. Repeat for each purchase.
    #[arg(long = "line", required = true)]
    lines: Vec<ReceiptLine>,
}

impl RegisterArgs {
    pub fn new(date: NaiveDate, lines: Vec<ReceiptLine>) -> Self {
        Self { date, lines }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }
}

/// Args for the `hbook edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The date as YYYY-MM-DD.
    date: NaiveDate,

    /// The zero-based index of a line to remove, as shown by `hbook day`. May be repeated.
    #[arg(long = "remove")]
    remove: Vec<usize>,

    /// A purchase to add as STORE=COST. May be repeated.
    #[arg(long = "line")]
    lines: Vec<ReceiptLine>,
}

impl EditArgs {
    pub fn new(date: NaiveDate, remove: Vec<usize>, lines: Vec<ReceiptLine>) -> Self {
        Self {
            date,
            remove,
            lines,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn remove(&self) -> &[usize] {
        &self.remove
    }

    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }
}

fn default_hbook_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("household-book"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --hbook-home or HBOOK_HOME instead of relying on the default \
                directory. If you continue using the program right now, you may have problems!",
            );
            PathBuf::from("household-book")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
