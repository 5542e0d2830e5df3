//! Sends a day's receipt to the backend once it has passed validation.
//!
//! Whether a day is posted or updated is decided from the month snapshot the day was edited
//! against: a date without a registered cell is posted, anything else is updated.

use crate::api::{Backend, ReceiptRequest, ReceiptResponse, STATUS_CREATED, STATUS_OK};
use crate::model::{DailyCost, DailyReceipt, MonthError, MonthlyReceipt};
use crate::validate::{validate, Rejection, UnfilledPolicy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// The write used to register a day.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Post,
    Update,
}

serde_plain::derive_display_from_serialize!(Action);
serde_plain::derive_fromstr_from_deserialize!(Action);

impl Action {
    /// The status the backend answers a successful write of this kind with.
    pub fn expected_status(&self) -> u16 {
        match self {
            Action::Post => STATUS_CREATED,
            Action::Update => STATUS_OK,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The receipt broke a rule and nothing was sent.
    #[error("the receipt was rejected: {0}")]
    Rejected(#[from] Rejection),

    /// The receipt belongs to a different month than the snapshot it was edited against.
    #[error(transparent)]
    Month(#[from] MonthError),

    /// The backend answered, but not with the status that means success.
    #[error("{action} answered with unexpected status {status}")]
    Unexpected { action: Action, status: u16 },

    /// The backend could not be reached or its answer could not be read.
    #[error("the backend call failed")]
    Backend(#[source] anyhow::Error),
}

impl SubmitError {
    /// The rejection behind this error, if the receipt was rejected.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            SubmitError::Rejected(rejection) => Some(*rejection),
            _ => None,
        }
    }
}

/// A receipt the backend accepted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub action: Action,
    pub date: NaiveDate,
    /// The purchases as the backend returned them.
    pub daily_cost: Vec<DailyCost>,
}

/// Validates `daily`, then posts or updates it depending on whether `monthly` shows the date as
/// registered.
pub async fn register(
    backend: &mut (dyn Backend + Send),
    monthly: &MonthlyReceipt,
    daily: &DailyReceipt,
    policy: UnfilledPolicy,
) -> Result<Submission, SubmitError> {
    let date = daily.date();
    if !monthly.month().contains(date) {
        return Err(MonthError::OutsideMonth {
            date,
            month: monthly.month(),
        }
        .into());
    }

    validate(daily, policy)?;
    let daily_cost = daily
        .lines()
        .iter()
        .map(|line| line.to_daily_cost(policy))
        .collect::<Result<Vec<_>, Rejection>>()?;

    let action = if monthly.is_registered(date) {
        Action::Update
    } else {
        Action::Post
    };
    debug!("Registering {date} with {action}");
    send(backend, action, ReceiptRequest { purchase_date: date, daily_cost }).await
}

/// Registers `date` as a day on which nothing was bought.
pub async fn register_no_spend(
    backend: &mut (dyn Backend + Send),
    date: NaiveDate,
) -> Result<Submission, SubmitError> {
    debug!("Registering {date} as a day without spending");
    let request = ReceiptRequest {
        purchase_date: date,
        daily_cost: Vec::new(),
    };
    send(backend, Action::Post, request).await
}

async fn send(
    backend: &mut (dyn Backend + Send),
    action: Action,
    request: ReceiptRequest,
) -> Result<Submission, SubmitError> {
    trace!("{action} {request:?}");
    let response: ReceiptResponse = match action {
        Action::Post => backend.post(&request).await,
        Action::Update => backend.update(&request).await,
    }
    .map_err(SubmitError::Backend)?;

    if response.status != action.expected_status() {
        return Err(SubmitError::Unexpected {
            action,
            status: response.status,
        });
    }
    Ok(Submission {
        action,
        date: request.purchase_date,
        daily_cost: response.data.daily_cost,
    })
}
