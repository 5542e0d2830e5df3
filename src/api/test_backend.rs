//! Implements the `Backend` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a backend.

use crate::api::{Backend, ReceiptRequest, ReceiptResponse, STATUS_CREATED, STATUS_OK};
use crate::model::{DailyCost, ReceiptRecord, YearMonth};
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::str::FromStr;
use tracing::trace;

const STATUS_NOT_FOUND: u16 = 404;
const STATUS_CONFLICT: u16 = 409;

/// The kind of write a `TestBackend` received.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Call {
    Post,
    Update,
}

/// An implementation of the `Backend` trait that keeps receipts in memory. By default it is seeded
/// with a handful of receipts from February 2024.
pub struct TestBackend {
    data: BTreeMap<NaiveDate, Vec<DailyCost>>,
    /// When set, every write is answered with this status and changes nothing.
    failing_status: Option<u16>,
    calls: Vec<(Call, ReceiptRequest)>,
}

impl TestBackend {
    /// Create a new `TestBackend` holding `data`.
    pub fn new(data: BTreeMap<NaiveDate, Vec<DailyCost>>) -> Self {
        Self {
            data,
            failing_status: None,
            calls: Vec::new(),
        }
    }

    /// A backend that holds nothing.
    pub fn empty() -> Self {
        Self::new(BTreeMap::new())
    }

    /// Makes every following write answer `status`.
    pub fn fail_with(mut self, status: u16) -> Self {
        self.failing_status = Some(status);
        self
    }

    /// The writes received so far, oldest first.
    pub fn calls(&self) -> &[(Call, ReceiptRequest)] {
        &self.calls
    }

    /// The stored purchases of `date`, if the date was registered.
    pub fn day(&self, date: NaiveDate) -> Option<&[DailyCost]> {
        self.data.get(&date).map(Vec::as_slice)
    }

    fn write(&mut self, call: Call, request: &ReceiptRequest) -> ReceiptResponse {
        trace!("{call:?} for {}", request.purchase_date);
        self.calls.push((call, request.clone()));
        if let Some(status) = self.failing_status {
            return ReceiptResponse::status_only(status);
        }
        let exists = self.data.contains_key(&request.purchase_date);
        match (call, exists) {
            (Call::Post, true) => ReceiptResponse::status_only(STATUS_CONFLICT),
            (Call::Update, false) => ReceiptResponse::status_only(STATUS_NOT_FOUND),
            (Call::Post, false) | (Call::Update, true) => {
                self.data
                    .insert(request.purchase_date, request.daily_cost.clone());
                let status = if call == Call::Post {
                    STATUS_CREATED
                } else {
                    STATUS_OK
                };
                ReceiptResponse::new(status, request.daily_cost.clone())
            }
        }
    }
}

#[async_trait::async_trait]
impl Backend for TestBackend {
    async fn post(&mut self, request: &ReceiptRequest) -> Result<ReceiptResponse> {
        Ok(self.write(Call::Post, request))
    }

    async fn update(&mut self, request: &ReceiptRequest) -> Result<ReceiptResponse> {
        Ok(self.write(Call::Update, request))
    }

    async fn month(&mut self, month: YearMonth) -> Result<Vec<ReceiptRecord>> {
        Ok(self
            .data
            .range(month.first_day()..=month.last_day())
            .map(|(date, costs)| ReceiptRecord::new(*date, costs.clone()))
            .collect())
    }
}

impl Default for TestBackend {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::new(default_data())
    }
}

/// Provides the seed data from this module.
fn default_data() -> BTreeMap<NaiveDate, Vec<DailyCost>> {
    load_csv(RECEIPT_DATA).unwrap()
}

/// Loads `date,store,cost` rows from a CSV-formatted string. A row with an empty store and cost is
/// a date registered as having no spending.
fn load_csv(csv_data: &str) -> Result<BTreeMap<NaiveDate, Vec<DailyCost>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut data: BTreeMap<NaiveDate, Vec<DailyCost>> = BTreeMap::new();
    for result in rdr.records() {
        let record = result?;
        let field = |ix: usize| record.get(ix).unwrap_or_default().trim();
        let date = NaiveDate::from_str(field(0))
            .with_context(|| format!("Bad date in seed data '{}'", field(0)))?;
        let costs = data.entry(date).or_default();
        if field(1).is_empty() {
            continue;
        }
        let cost = Decimal::from_str(field(2))
            .with_context(|| format!("Bad cost in seed data '{}'", field(2)))?;
        costs.push(DailyCost::new(field(1), cost));
    }
    Ok(data)
}

/// Seed receipt data.
const RECEIPT_DATA: &str = r##"date,store,cost
2024-02-01,Life Supermarket,2380
2024-02-01,Matsumoto Kiyoshi,968
2024-02-02,Seven-Eleven,540
2024-02-03,,
2024-02-05,Life Supermarket,3120
2024-02-07,Doutor Coffee,420
2024-02-07,Uniqlo,3990
2024-02-10,Gyomu Super,4215
2024-02-12,Tea Stand,0
2024-02-14,Patisserie Kanou,1800
2024-02-18,Life Supermarket,2760
2024-02-21,Tokyo Gas,6540
2024-02-25,Seven-Eleven,310
2024-02-29,Gyomu Super,3870
"##;
