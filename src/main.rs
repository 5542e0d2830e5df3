use clap::Parser;
use household_book::args::{Args, Command};
use household_book::{commands, Config, Mode, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().hbook_home().path();

    // When HBOOK_IN_TEST_MODE is set and non-empty the in-memory backend is used instead of the
    // configured one.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(),

        Command::Month(month_args) => {
            let config = Config::load(home).await?;
            commands::month(config, mode, month_args.month())
                .await?
                .print()
        }

        Command::Day(day_args) => {
            let config = Config::load(home).await?;
            commands::day(config, mode, day_args.date()).await?.print()
        }

        Command::Register(register_args) => {
            let config = Config::load(home).await?;
            commands::register(
                config,
                mode,
                register_args.date(),
                register_args.lines().to_vec(),
            )
            .await?
            .print()
        }

        Command::Edit(edit_args) => {
            let config = Config::load(home).await?;
            commands::edit(
                config,
                mode,
                edit_args.date(),
                edit_args.remove(),
                edit_args.lines().to_vec(),
            )
            .await?
            .print()
        }

        Command::NoSpend(day_args) => {
            let config = Config::load(home).await?;
            commands::no_spend(config, mode, day_args.date())
                .await?
                .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the library and binary only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level,
                env!("CARGO_CRATE_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
