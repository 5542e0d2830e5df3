use crate::model::{Amount, Cost};
use crate::validate::{Rejection, UnfilledPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The cost sent for a line whose cost was never entered, when the configured policy allows such
/// lines through at all.
pub const UNFILLED_COST: Decimal = Decimal::ZERO;

/// A single purchase: where, and how much.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReceiptLine {
    store_name: String,
    cost: Cost,
}

impl ReceiptLine {
    pub fn new(store_name: impl Into<String>, cost: impl Into<Cost>) -> Self {
        Self {
            store_name: store_name.into(),
            cost: cost.into(),
        }
    }

    /// A freshly added row: no store and no cost yet.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn cost(&self) -> &Cost {
        &self.cost
    }

    /// Returns a copy with the store name replaced.
    pub fn with_store_name(&self, store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            cost: self.cost.clone(),
        }
    }

    /// Returns a copy with the cost replaced by the interpretation of `input`.
    pub fn with_cost_input(&self, input: &str) -> Self {
        Self {
            store_name: self.store_name.clone(),
            cost: Cost::parse(input),
        }
    }

    /// The store name with surrounding whitespace removed, used whenever lines are compared.
    pub(crate) fn store_key(&self) -> &str {
        self.store_name.trim()
    }

    /// Projects the line into the shape the backend accepts.
    ///
    /// An `Unfilled` cost only becomes `UNFILLED_COST` under `UnfilledPolicy::SubmitAsZero`.
    pub fn to_daily_cost(&self, policy: UnfilledPolicy) -> Result<DailyCost, Rejection> {
        let cost = match &self.cost {
            Cost::Entered(amount) => amount.value(),
            Cost::Unfilled => match policy {
                UnfilledPolicy::SubmitAsZero => UNFILLED_COST,
                UnfilledPolicy::Reject => return Err(Rejection::ExistsUnfilledReceipt),
            },
            Cost::Invalid(_) => return Err(Rejection::ExistsInvalidReceipt),
        };
        Ok(DailyCost::new(self.store_key(), cost))
    }
}

/// Parses `STORE=COST`, the form lines take on the command line. The cost part may be empty,
/// which leaves the line unfilled.
impl FromStr for ReceiptLine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (store, cost) = s
            .rsplit_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected STORE=COST but got '{s}'"))?;
        Ok(Self {
            store_name: store.to_string(),
            cost: Cost::parse(cost),
        })
    }
}

/// One purchase as exchanged with the backend. A `null` or missing cost is a line whose cost was
/// never entered.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCost {
    pub store_name: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub cost: Option<Decimal>,
}

impl DailyCost {
    pub fn new(store_name: impl Into<String>, cost: impl Into<Decimal>) -> Self {
        Self {
            store_name: store_name.into(),
            cost: Some(cost.into()),
        }
    }

    pub fn unfilled(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            cost: None,
        }
    }
}

impl From<&DailyCost> for ReceiptLine {
    fn from(value: &DailyCost) -> Self {
        let cost = match value.cost {
            Some(cost) => Cost::Entered(Amount::new(cost)),
            None => Cost::Unfilled,
        };
        ReceiptLine::new(value.store_name.clone(), cost)
    }
}
