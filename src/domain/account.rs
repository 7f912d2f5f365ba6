use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::{Error, Money, PriceOracle, Symbol, Transaction, TransactionKind};

/// Cash, share positions and audit log of one simulated trading account.
///
/// State only changes through [`deposit`](Account::deposit),
/// [`withdraw`](Account::withdraw), [`buy`](Account::buy) and
/// [`sell`](Account::sell). Each of them validates fully before touching
/// anything, then commits the new state together with exactly one
/// [`Transaction`].
#[derive(Debug)]
pub struct Account<P: PriceOracle> {
    id: String,
    balance: Money,                  // never negative
    holdings: BTreeMap<Symbol, i64>, // quantities are always > 0
    transactions: Vec<Transaction>,
    total_deposits: Money,
    total_withdrawals: Money,
    oracle: P,
}

impl<P: PriceOracle> Account<P> {
    pub fn create(id: &str, oracle: P) -> Result<Self, Error> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::InvalidArgument(
                "account id cannot be empty".to_string(),
            ));
        }

        let mut account = Self {
            id: id.to_owned(),
            balance: Money::ZERO,
            holdings: BTreeMap::new(),
            transactions: Vec::new(),
            total_deposits: Money::ZERO,
            total_withdrawals: Money::ZERO,
            oracle,
        };
        account.append(TransactionKind::AccountCreated);
        info!(account = %account.id, "account created");

        Ok(account)
    }

    pub fn deposit(&mut self, amount: Money) -> Result<(), Error> {
        if !amount.is_positive() {
            return Err(Error::InvalidArgument(format!(
                "deposit amount must be positive, got {}",
                amount
            )));
        }
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| overflow("balance"))?;
        let total_deposits = self
            .total_deposits
            .checked_add(amount)
            .ok_or_else(|| overflow("total deposits"))?;

        self.balance = balance;
        self.total_deposits = total_deposits;
        self.append(TransactionKind::Deposit { amount });
        debug!(account = %self.id, %amount, balance = %self.balance, "deposit applied");

        Ok(())
    }

    pub fn withdraw(&mut self, amount: Money) -> Result<(), Error> {
        if !amount.is_positive() {
            return Err(Error::InvalidArgument(format!(
                "withdrawal amount must be positive, got {}",
                amount
            )));
        }
        if amount > self.balance {
            return Err(Error::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        let balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| overflow("balance"))?;
        let total_withdrawals = self
            .total_withdrawals
            .checked_add(amount)
            .ok_or_else(|| overflow("total withdrawals"))?;

        self.balance = balance;
        self.total_withdrawals = total_withdrawals;
        self.append(TransactionKind::Withdraw { amount });
        debug!(account = %self.id, %amount, balance = %self.balance, "withdrawal applied");

        Ok(())
    }

    pub fn buy(&mut self, symbol: &str, quantity: i64) -> Result<(), Error> {
        check_quantity(quantity)?;
        let symbol = Symbol::new(symbol);
        let price_per_share = self.price_of(&symbol)?;

        let cost = price_per_share
            .checked_mul_quantity(quantity)
            .ok_or_else(|| overflow("order cost"))?;
        if cost > self.balance {
            return Err(Error::InsufficientFunds {
                requested: cost,
                available: self.balance,
            });
        }
        let balance = self
            .balance
            .checked_sub(cost)
            .ok_or_else(|| overflow("balance"))?;
        let held = self.quantity(&symbol);
        let position = held
            .checked_add(quantity)
            .ok_or_else(|| overflow("position"))?;

        self.balance = balance;
        self.holdings.insert(symbol.clone(), position);
        debug!(
            account = %self.id,
            %symbol,
            quantity,
            price = %price_per_share,
            balance = %self.balance,
            "buy applied"
        );
        self.append(TransactionKind::Buy {
            symbol,
            quantity,
            price_per_share,
        });

        Ok(())
    }

    pub fn sell(&mut self, symbol: &str, quantity: i64) -> Result<(), Error> {
        check_quantity(quantity)?;
        let symbol = Symbol::new(symbol);

        let held = self.quantity(&symbol);
        if held < quantity {
            return Err(Error::InsufficientHoldings {
                symbol: symbol.to_string(),
                requested: quantity,
                held,
            });
        }
        let price_per_share = self.price_of(&symbol)?;
        let revenue = price_per_share
            .checked_mul_quantity(quantity)
            .ok_or_else(|| overflow("order revenue"))?;
        let balance = self
            .balance
            .checked_add(revenue)
            .ok_or_else(|| overflow("balance"))?;

        self.balance = balance;
        let remaining = held - quantity;
        if remaining == 0 {
            self.holdings.remove(&symbol);
        } else {
            self.holdings.insert(symbol.clone(), remaining);
        }
        debug!(
            account = %self.id,
            %symbol,
            quantity,
            price = %price_per_share,
            balance = %self.balance,
            "sell applied"
        );
        self.append(TransactionKind::Sell {
            symbol,
            quantity,
            price_per_share,
        });

        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn holdings(&self) -> BTreeMap<Symbol, i64> {
        self.holdings.clone()
    }

    /// Shares held of `symbol`; 0 when there is no position.
    pub fn quantity(&self, symbol: &Symbol) -> i64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn total_deposits(&self) -> Money {
        self.total_deposits
    }

    pub fn total_withdrawals(&self) -> Money {
        self.total_withdrawals
    }

    /// Deposits minus withdrawals: the cost basis for profit and loss.
    pub fn net_capital(&self) -> Result<Money, Error> {
        self.total_deposits
            .checked_sub(self.total_withdrawals)
            .ok_or_else(|| overflow("net capital"))
    }

    /// Cash plus every position marked at the oracle's current price.
    ///
    /// A held symbol the oracle cannot price is an error rather than being
    /// valued at zero.
    pub fn portfolio_value(&self) -> Result<Money, Error> {
        self.holdings
            .iter()
            .try_fold(self.balance, |value, (symbol, quantity)| {
                let price = self.price_of(symbol)?;
                price
                    .checked_mul_quantity(*quantity)
                    .and_then(|position| value.checked_add(position))
                    .ok_or_else(|| overflow("portfolio value"))
            })
    }

    pub fn profit_loss(&self) -> Result<Money, Error> {
        let value = self.portfolio_value()?;
        value
            .checked_sub(self.net_capital()?)
            .ok_or_else(|| overflow("profit/loss"))
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    pub fn oracle(&self) -> &P {
        &self.oracle
    }

    fn price_of(&self, symbol: &Symbol) -> Result<Money, Error> {
        let price = self.oracle.lookup_price(symbol)?;
        if !price.is_positive() {
            return Err(Error::InvalidArgument(format!(
                "price for {} must be positive, got {}",
                symbol, price
            )));
        }
        Ok(price)
    }

    fn append(&mut self, kind: TransactionKind) {
        self.transactions
            .push(Transaction::record(&self.id, kind, self.balance));
    }
}

fn check_quantity(quantity: i64) -> Result<(), Error> {
    if quantity <= 0 {
        return Err(Error::InvalidArgument(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    Ok(())
}

fn overflow(what: &str) -> Error {
    Error::InvalidArgument(format!("{} out of range", what))
}
