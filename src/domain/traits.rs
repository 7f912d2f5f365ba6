use std::sync::Arc;

use futures::Stream;

use crate::domain::{Account, Command, Error, Money, Symbol};

/// Source of current share prices.
///
/// Implementations must fail with [`Error::UnknownSymbol`] for symbols they
/// cannot price and must only ever return positive prices.
pub trait PriceOracle {
    fn lookup_price(&self, symbol: &Symbol) -> Result<Money, Error>;
}

impl<T: PriceOracle + ?Sized> PriceOracle for &T {
    fn lookup_price(&self, symbol: &Symbol) -> Result<Money, Error> {
        (**self).lookup_price(symbol)
    }
}

impl<T: PriceOracle + ?Sized> PriceOracle for Arc<T> {
    fn lookup_price(&self, symbol: &Symbol) -> Result<Money, Error> {
        (**self).lookup_price(symbol)
    }
}

pub trait CommandStream {
    type CmdStream: Stream<Item = Result<Command, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::CmdStream;
}

pub trait DeadLetterQueue {
    fn report(&self, error: &Error);
}

pub trait StatementOutput {
    fn publish<P: PriceOracle>(&mut self, account: &Account<P>) -> Result<(), Error>;
}
