use chrono::{DateTime, Utc};

use crate::domain::{Money, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    AccountCreated,
    Deposit {
        amount: Money,
    },
    Withdraw {
        amount: Money,
    },
    Buy {
        symbol: Symbol,
        quantity: i64,
        price_per_share: Money,
    },
    Sell {
        symbol: Symbol,
        quantity: i64,
        price_per_share: Money,
    },
}

impl TransactionKind {
    /// Name used in the statement's `type` column.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::AccountCreated => "account_created",
            TransactionKind::Deposit { .. } => "deposit",
            TransactionKind::Withdraw { .. } => "withdraw",
            TransactionKind::Buy { .. } => "buy",
            TransactionKind::Sell { .. } => "sell",
        }
    }
}

/// Immutable audit log entry. Only the account ledger builds these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub timestamp: DateTime<Utc>,
    pub account_id: String,
    pub balance_after: Money,
}

impl Transaction {
    pub(crate) fn record(account_id: &str, kind: TransactionKind, balance_after: Money) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
            account_id: account_id.to_owned(),
            balance_after,
        }
    }

    /// Cash moved by this event: trade value for buy/sell, amount for deposit/withdraw.
    pub fn notional(&self) -> Money {
        match &self.kind {
            TransactionKind::AccountCreated => Money::ZERO,
            TransactionKind::Deposit { amount } | TransactionKind::Withdraw { amount } => *amount,
            TransactionKind::Buy {
                quantity,
                price_per_share,
                ..
            }
            | TransactionKind::Sell {
                quantity,
                price_per_share,
                ..
            } => price_per_share
                .checked_mul_quantity(*quantity)
                .unwrap_or(Money::ZERO),
        }
    }
}

impl core::fmt::Display for Transaction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.kind {
            TransactionKind::AccountCreated => write!(
                f,
                "{},account={},balance={}",
                self.kind.label(),
                self.account_id,
                self.balance_after
            ),
            TransactionKind::Deposit { amount } | TransactionKind::Withdraw { amount } => write!(
                f,
                "{},account={},amount={},balance={}",
                self.kind.label(),
                self.account_id,
                amount,
                self.balance_after
            ),
            TransactionKind::Buy {
                symbol,
                quantity,
                price_per_share,
            }
            | TransactionKind::Sell {
                symbol,
                quantity,
                price_per_share,
            } => write!(
                f,
                "{},account={},symbol={},quantity={},price={},balance={}",
                self.kind.label(),
                self.account_id,
                symbol,
                quantity,
                price_per_share,
                self.balance_after
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notional_of_trade_is_quantity_times_price() {
        let tx = Transaction::record(
            "A1",
            TransactionKind::Buy {
                symbol: Symbol::new("AAPL"),
                quantity: 2,
                price_per_share: Money::from(170),
            },
            Money::from(660),
        );
        assert_eq!(tx.notional(), Money::from(340));
        assert_eq!(
            tx.to_string(),
            "buy,account=A1,symbol=AAPL,quantity=2,price=170.0000,balance=660.0000"
        );
    }
}
