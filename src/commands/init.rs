use crate::args::InitArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` from `args`.
///
/// # Arguments
/// - `hbook_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/household-book`
/// - `args` - The backend URL, the optional API key and the entry settings.
///
/// # Errors
/// - Returns an error if the backend URL is invalid or if any file operations fail.
pub async fn init(hbook_home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(
        hbook_home,
        args.backend_url(),
        args.api_key().map(str::to_string),
        args.locale(),
        args.unfilled_policy(),
    )
    .await
    .context("Unable to create the data directory and config")
    .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the household book config at {}",
        config.config_path().display()
    )
    .into())
}
