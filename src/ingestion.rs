use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use serde::Deserialize;

use crate::domain::traits::CommandStream;
use crate::domain::{Command, Error, Money, Symbol};

pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        Self { reader: Some(rdr) }
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CsvRow {
    op: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    symbol: Option<Symbol>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    quantity: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    amount: Option<Money>,
}

impl TryFrom<CsvRow> for Command {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let symbol = row.symbol.filter(|s| !s.is_empty());
        let op = row.op.trim().to_ascii_lowercase();

        match (op.as_str(), symbol, row.quantity, row.amount) {
            ("deposit", _, _, Some(amount)) => Ok(Command::Deposit { amount }),
            ("withdraw", _, _, Some(amount)) => Ok(Command::Withdraw { amount }),
            ("buy", Some(symbol), Some(quantity), _) => Ok(Command::Buy { symbol, quantity }),
            ("sell", Some(symbol), Some(quantity), _) => Ok(Command::Sell { symbol, quantity }),
            ("deposit" | "withdraw", ..) => Err(Error::Ingestion(format!(
                "{} requires an amount",
                op
            ))),
            ("buy" | "sell", ..) => Err(Error::Ingestion(format!(
                "{} requires a symbol and a quantity",
                op
            ))),
            (other, ..) => Err(Error::Ingestion(format!("Invalid command type: {}", other))),
        }
    }
}

impl<R: Read + Send + 'static> CommandStream for CsvReader<R> {
    type CmdStream = Pin<Box<dyn Stream<Item = Result<Command, Error>> + Send>>;

    fn stream(&mut self) -> Self::CmdStream {
        let reader = match self.reader.take() {
            Some(r) => r,
            // Already consumed.
            None => return Box::pin(stream::empty::<Result<Command, Error>>()),
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => Command::try_from(row),
                Err(e) => Err(Error::Ingestion(format!(
                    "CSV deserialization error: {}",
                    e
                ))),
            });

        Box::pin(stream::iter(iter))
    }
}
