use crate::domain::{Money, Symbol};

/// A requested account operation, before the ledger validates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Deposit { amount: Money },
    Withdraw { amount: Money },
    Buy { symbol: Symbol, quantity: i64 },
    Sell { symbol: Symbol, quantity: i64 },
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Command::Deposit { amount } => write!(f, "deposit {}", amount),
            Command::Withdraw { amount } => write!(f, "withdraw {}", amount),
            Command::Buy { symbol, quantity } => write!(f, "buy {} {}", quantity, symbol),
            Command::Sell { symbol, quantity } => write!(f, "sell {} {}", quantity, symbol),
        }
    }
}
