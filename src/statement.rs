use std::io::Write;

use serde::Serialize;

use crate::domain::{
    Account, Error, Money, PriceOracle, StatementOutput, Transaction, TransactionKind,
};

/// Writes an account statement as three CSV sections: summary, holdings and
/// transaction history.
#[derive(Debug)]
pub struct CsvStatement<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvStatement<W> {
    pub fn new(out: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_writer(out);

        Self { writer }
    }

    pub fn into_inner(self) -> Result<W, Error> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Output(e.to_string()))
    }
}

impl CsvStatement<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    account: &'a str,
    balance: Money,
    portfolio_value: Money,
    profit_loss: Money,
}

#[derive(Debug, Serialize)]
struct TransactionRow<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    timestamp: String,
    symbol: Option<&'a str>,
    quantity: Option<i64>,
    price_per_share: Option<Money>,
    amount: Option<Money>,
    balance_after: Money,
}

impl<'a> From<&'a Transaction> for TransactionRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        let (symbol, quantity, price_per_share, amount) = match &tx.kind {
            TransactionKind::AccountCreated => (None, None, None, None),
            TransactionKind::Deposit { amount } | TransactionKind::Withdraw { amount } => {
                (None, None, None, Some(*amount))
            }
            TransactionKind::Buy {
                symbol,
                quantity,
                price_per_share,
            }
            | TransactionKind::Sell {
                symbol,
                quantity,
                price_per_share,
            } => (
                Some(symbol.as_str()),
                Some(*quantity),
                Some(*price_per_share),
                None,
            ),
        };

        Self {
            kind: tx.kind.label(),
            timestamp: tx.timestamp.to_rfc3339(),
            symbol,
            quantity,
            price_per_share,
            amount,
            balance_after: tx.balance_after,
        }
    }
}

impl<W: Write> StatementOutput for CsvStatement<W> {
    fn publish<P: PriceOracle>(&mut self, account: &Account<P>) -> Result<(), Error> {
        // Price everything up front so a failed lookup writes nothing.
        let summary = SummaryRow {
            account: account.id(),
            balance: account.balance(),
            portfolio_value: account.portfolio_value()?,
            profit_loss: account.profit_loss()?,
        };

        self.writer
            .write_record(["account", "balance", "portfolio_value", "profit_loss"])?;
        self.writer.serialize(summary)?;

        self.writer.write_record(["symbol", "quantity"])?;
        for (symbol, quantity) in account.holdings() {
            self.writer
                .write_record([symbol.as_str(), quantity.to_string().as_str()])?;
        }

        self.writer.write_record([
            "type",
            "timestamp",
            "symbol",
            "quantity",
            "price_per_share",
            "amount",
            "balance_after",
        ])?;
        for tx in &account.transactions() {
            self.writer.serialize(TransactionRow::from(tx))?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::domain::Symbol;
    use crate::price_table::FixedPriceTable;

    #[test]
    fn writes_all_three_sections() {
        let mut account = Account::create("A1", FixedPriceTable::reference()).unwrap();
        account.deposit(Money::from(1000)).unwrap();
        account.buy("AAPL", 2).unwrap();
        account.buy("GOOGL", 1).unwrap();

        let mut statement = CsvStatement::new(Vec::new());
        statement.publish(&account).unwrap();
        let text = String::from_utf8(statement.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "account,balance,portfolio_value,profit_loss");
        assert_eq!(lines[1], "A1,520.0000,1000.0000,0.0000");
        assert_eq!(lines[2], "symbol,quantity");
        assert_eq!(lines[3], "AAPL,2");
        assert_eq!(lines[4], "GOOGL,1");
        assert_eq!(
            lines[5],
            "type,timestamp,symbol,quantity,price_per_share,amount,balance_after"
        );
        assert_eq!(lines.len(), 10);
        assert!(lines[6].starts_with("account_created,"));
        assert!(lines[6].ends_with(",,,,,0.0000"));
        assert!(lines[7].starts_with("deposit,"));
        assert!(lines[7].ends_with(",,,,1000.0000,1000.0000"));
        assert!(lines[8].ends_with(",AAPL,2,170.0000,,660.0000"));
    }

    #[test]
    fn unpriceable_holding_fails_publish() {
        struct Halting(Cell<bool>);

        impl PriceOracle for Halting {
            fn lookup_price(&self, symbol: &Symbol) -> Result<Money, Error> {
                if self.0.get() {
                    Err(Error::UnknownSymbol(symbol.to_string()))
                } else {
                    Ok(Money::from(5))
                }
            }
        }

        let oracle = Halting(Cell::new(false));
        let mut account = Account::create("A1", &oracle).unwrap();
        account.deposit(Money::from(10)).unwrap();
        account.buy("XYZ", 1).unwrap();

        oracle.0.set(true);
        let mut statement = CsvStatement::new(Vec::new());
        assert!(matches!(
            statement.publish(&account),
            Err(Error::UnknownSymbol(_))
        ));
        assert!(statement.into_inner().unwrap().is_empty());
    }
}
