use std::fs::File;

use clap::Parser;

use trading_account::config::{self, Settings};
use trading_account::dlq::StdErrDLQ;
use trading_account::domain::Account;
use trading_account::engine::Engine;
use trading_account::ingestion::CsvReader;
use trading_account::statement::CsvStatement;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::init_logging();
    let settings = Settings::parse();

    let prices = settings.price_table()?;
    let account = Account::create(&settings.account_id, prices)?;
    let file = File::open(&settings.commands)?;

    // Wire the components and replay the script
    let mut engine = Engine::new(
        CsvReader::new(file),
        CsvStatement::stdout(),
        StdErrDLQ::new(),
        account,
    );
    engine.process().await?;
    engine.publish()?;

    Ok(())
}
