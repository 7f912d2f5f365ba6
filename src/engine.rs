use futures::StreamExt;
use tracing::info;

use crate::domain::{
    Account, Command, Error, PriceOracle,
    traits::{CommandStream, DeadLetterQueue, StatementOutput},
};

/// Replays a stream of commands against a single account.
#[derive(Debug)]
pub struct Engine<I, O, D, P>
where
    I: CommandStream,
    O: StatementOutput,
    D: DeadLetterQueue,
    P: PriceOracle,
{
    ingestion: I,
    output: O,
    dlq: D,
    account: Account<P>,
}

impl<I, O, D, P> Engine<I, O, D, P>
where
    I: CommandStream,
    O: StatementOutput,
    D: DeadLetterQueue,
    P: PriceOracle,
{
    pub fn new(ingestion: I, output: O, dlq: D, account: Account<P>) -> Self {
        Self {
            ingestion,
            output,
            dlq,
            account,
        }
    }

    /// Applies every command in the stream, returning how many succeeded.
    ///
    /// Rows that fail to parse and commands the ledger rejects go to the
    /// dead-letter queue; neither stops processing.
    pub async fn process(&mut self) -> Result<usize, Error> {
        let mut commands = self.ingestion.stream();
        let mut applied = 0;

        while let Some(cmd) = commands.next().await {
            match cmd {
                Ok(cmd) => match self.apply_command(&cmd) {
                    Ok(()) => applied += 1,
                    Err(e) => self.dlq.report(&e),
                },
                Err(e) => self.dlq.report(&e),
            }
        }

        info!(account = %self.account.id(), applied, "command stream drained");
        Ok(applied)
    }

    fn apply_command(&mut self, cmd: &Command) -> Result<(), Error> {
        match cmd {
            Command::Deposit { amount } => self.account.deposit(*amount),
            Command::Withdraw { amount } => self.account.withdraw(*amount),
            Command::Buy { symbol, quantity } => self.account.buy(symbol.as_str(), *quantity),
            Command::Sell { symbol, quantity } => self.account.sell(symbol.as_str(), *quantity),
        }
    }

    pub fn account(&self) -> &Account<P> {
        &self.account
    }

    pub fn publish(&mut self) -> Result<(), Error> {
        self.output.publish(&self.account)
    }

    pub fn into_parts(self) -> (Account<P>, O) {
        (self.account, self.output)
    }
}
