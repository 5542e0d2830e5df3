//! Commands that change what is registered for a day.

use crate::api::Mode;
use crate::commands::{day, open_month, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{DailyReceipt, ReceiptLine, YearMonth};
use crate::submission::{self, SubmitError, Submission};
use crate::{Config, Result};
use anyhow::Context;
use chrono::NaiveDate;
use tracing::debug;

/// Registers `lines` as the whole receipt of `date`.
pub async fn register(
    config: Config,
    mode: Mode,
    date: NaiveDate,
    lines: Vec<ReceiptLine>,
) -> Result<Out<Submission>> {
    submit(&config, mode, date, |_| Ok(DailyReceipt::new(date, lines))).await
}

/// Starts from the registered lines of `date`, removes the lines at `remove`, appends `lines`
/// and registers the result.
pub async fn edit(
    config: Config,
    mode: Mode,
    date: NaiveDate,
    remove: &[usize],
    lines: Vec<ReceiptLine>,
) -> Result<Out<Submission>> {
    // highest index first so earlier removals do not shift later ones
    let mut remove = remove.to_vec();
    remove.sort_unstable_by(|a, b| b.cmp(a));
    remove.dedup();

    submit(&config, mode, date, |registered| {
        let mut daily = registered;
        for index in remove {
            daily = daily.delete(index)?;
        }
        Ok(lines.into_iter().fold(daily, |daily, line| daily.add(line)))
    })
    .await
}

/// Registers `date` as a day without spending.
pub async fn no_spend(config: Config, mode: Mode, date: NaiveDate) -> Result<Out<Submission>> {
    let mut backend = crate::api::backend(&config, mode).pub_result(ErrorType::Backend)?;
    let submission = submission::register_no_spend(backend.as_mut(), date).await;
    let submission = submit_result(submission)?;
    Ok(Out::new(
        format!("Registered {date} as a day without spending"),
        submission,
    ))
}

/// Loads the month of `date`, builds the day to register from its registered lines with `build`
/// and registers it. `build` sees the same lines, in the same order, as `hbook day` shows.
async fn submit<F>(
    config: &Config,
    mode: Mode,
    date: NaiveDate,
    build: F,
) -> Result<Out<Submission>>
where
    F: FnOnce(DailyReceipt) -> Result<DailyReceipt>,
{
    let (mut backend, monthly) = open_month(config, mode, YearMonth::of(date))
        .await
        .pub_result(ErrorType::Backend)?;
    let daily = build(monthly.get(date)).pub_result(ErrorType::Request)?;
    debug!("Submitting {} line(s) for {date}", daily.len());

    let policy = config.unfilled_policy();
    let submission = submission::register(backend.as_mut(), &monthly, &daily, policy).await;
    let submission = submit_result(submission)?;
    let message = format!(
        "Registered with {}: {}",
        submission.action,
        day::render(&daily, true)
    );
    Ok(Out::new(message, submission))
}

fn submit_result(result: std::result::Result<Submission, SubmitError>) -> Result<Submission> {
    match result {
        Ok(submission) => Ok(submission),
        Err(SubmitError::Rejected(rejection)) => Err(rejection)
            .context(rejection.message())
            .pub_result(ErrorType::Request),
        Err(e @ SubmitError::Month(_)) => Err(e).pub_result(ErrorType::Request),
        Err(e) => Err(e).pub_result(ErrorType::Backend),
    }
}
