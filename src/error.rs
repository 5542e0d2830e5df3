use anyhow::Context;
use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The layer an error surfaced from. Commands tag the errors they return to the user with one of
/// these so the message says where things went wrong before it says what went wrong.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Loading, creating or validating the configuration.
    Config,
    /// Talking to the backend, including unexpected status codes.
    Backend,
    /// The user's input was rejected before anything was sent.
    Request,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// Attaches an `ErrorType` to a result on its way out of a command.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(Into::into)
            .with_context(|| format!("{error_type} error"))
    }
}
