//! Heikeji cart command line tool

use std::{
    io::{self, Write},
    process::ExitCode,
};

use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use heikeji_cart::{
    config::{CartConfig, Command, ConfigError},
    fixtures::{Fixture, FixtureError},
    receipt::{Receipt, ReceiptError},
};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let config = match CartConfig::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_err| EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CartConfig) -> Result<(), CliError> {
    let policy = config.delivery_policy()?;

    match &config.command {
        Command::Receipt { fixture } => {
            let fixture_set = Fixture::from_set_in(&config.fixtures_dir, fixture)?;
            config.check_currency(fixture_set.currency()?)?;

            let cart = fixture_set.cart()?;

            info!(fixture = %fixture, lines = cart.len(), "loaded cart");

            let stdout = io::stdout();
            let handle = stdout.lock();

            Receipt::from_cart(&cart, &policy)?.write_to(handle)?;
        }
        Command::Stock { fixture } => {
            let fixture_set = Fixture::from_set_in(&config.fixtures_dir, fixture)?;
            let cart = fixture_set.cart()?;

            let shortages = cart.stock_shortages();

            let stdout = io::stdout();
            let mut handle = stdout.lock();

            if shortages.is_empty() {
                writeln!(handle, "All {} lines are in stock", cart.len())?;
            }

            for shortage in &shortages {
                warn!(key = %shortage.key, "line exceeds stock");

                writeln!(
                    handle,
                    "{} ({}): requested {}, available {}",
                    shortage.name, shortage.key, shortage.requested, shortage.available
                )?;
            }
        }
    }

    Ok(())
}
