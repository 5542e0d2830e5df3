//! The backend that stores receipts, seen only through the `Backend` trait.
//!
//! The real backend is reached over HTTP. A `TestBackend` holding data in memory stands in for it
//! in tests and, when `HBOOK_IN_TEST_MODE` is set, for the whole program.

mod http_backend;
mod test_backend;

use crate::model::{DailyCost, ReceiptRecord, YearMonth};
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use http_backend::HttpBackend;
pub use test_backend::{Call, TestBackend};

/// When this environment variable is set and non-empty the program runs against `TestBackend`.
pub const TEST_MODE_ENV: &str = "HBOOK_IN_TEST_MODE";

/// Status the backend answers a successful `post` with.
pub const STATUS_CREATED: u16 = 201;
/// Status the backend answers a successful `update` with.
pub const STATUS_OK: u16 = 200;

/// The body of a `post` or `update`: the full list of purchases for one date.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub purchase_date: NaiveDate,
    pub daily_cost: Vec<DailyCost>,
}

/// What the backend returned for a `post` or `update`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReceiptResponse {
    pub status: u16,
    pub data: ResponseData,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    #[serde(default)]
    pub daily_cost: Vec<DailyCost>,
}

impl ReceiptResponse {
    pub fn new(status: u16, daily_cost: Vec<DailyCost>) -> Self {
        Self {
            status,
            data: ResponseData { daily_cost },
        }
    }

    /// A response carrying only a status, as when a failing backend sends no usable body.
    pub fn status_only(status: u16) -> Self {
        Self::new(status, Vec::new())
    }
}

/// The operations the receipt book needs from its backend.
///
/// `post` and `update` report the status the backend answered with; deciding whether that status
/// means success is left to the caller. An `Err` means the call itself could not be made, or that a
/// successful answer could not be read.
#[async_trait::async_trait]
pub trait Backend {
    /// Registers a date for the first time.
    async fn post(&mut self, request: &ReceiptRequest) -> Result<ReceiptResponse>;

    /// Replaces the purchases of an already registered date.
    async fn update(&mut self, request: &ReceiptRequest) -> Result<ReceiptResponse>;

    /// Fetches every registered date of `month`.
    async fn month(&mut self, month: YearMonth) -> Result<Vec<ReceiptRecord>>;
}

/// Which `Backend` implementation the program talks to.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Http,
    Testing,
}

impl Mode {
    /// `Mode::Testing` when `HBOOK_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Http,
        }
    }
}

/// Creates the backend for `mode`.
pub fn backend(config: &Config, mode: Mode) -> Result<Box<dyn Backend + Send>> {
    debug!("Using the {mode:?} backend");
    Ok(match mode {
        Mode::Http => Box::new(HttpBackend::new(config)?),
        Mode::Testing => Box::new(TestBackend::default()),
    })
}
