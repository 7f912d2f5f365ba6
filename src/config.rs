use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::domain::Error;
use crate::price_table::FixedPriceTable;

/// Replays a CSV script of account commands and prints the resulting statement.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Settings {
    /// Identifier of the account the script runs against.
    pub account_id: String,

    /// CSV file with `op, symbol, quantity, amount` rows.
    pub commands: PathBuf,

    /// CSV file with `symbol, price` rows replacing the built-in price table.
    #[arg(long)]
    pub prices: Option<PathBuf>,
}

impl Settings {
    pub fn price_table(&self) -> Result<FixedPriceTable, Error> {
        match &self.prices {
            Some(path) => FixedPriceTable::from_csv(File::open(path)?),
            None => Ok(FixedPriceTable::reference()),
        }
    }
}

/// Logs to stderr so stdout carries only the statement. Honors `RUST_LOG`,
/// defaulting to `warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
