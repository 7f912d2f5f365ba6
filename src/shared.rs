use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{Account, Error, Money, PriceOracle, Symbol, Transaction};

/// Cloneable handle for driving one account from several tasks.
///
/// Every call holds the account lock for its whole validate-then-apply step,
/// so two concurrent withdrawals cannot both observe the same balance.
#[derive(Debug)]
pub struct SharedAccount<P: PriceOracle> {
    inner: Arc<Mutex<Account<P>>>,
}

impl<P: PriceOracle> Clone for SharedAccount<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: PriceOracle> SharedAccount<P> {
    pub fn new(account: Account<P>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(account)),
        }
    }

    pub async fn deposit(&self, amount: Money) -> Result<(), Error> {
        self.inner.lock().await.deposit(amount)
    }

    pub async fn withdraw(&self, amount: Money) -> Result<(), Error> {
        self.inner.lock().await.withdraw(amount)
    }

    pub async fn buy(&self, symbol: &str, quantity: i64) -> Result<(), Error> {
        self.inner.lock().await.buy(symbol, quantity)
    }

    pub async fn sell(&self, symbol: &str, quantity: i64) -> Result<(), Error> {
        self.inner.lock().await.sell(symbol, quantity)
    }

    pub async fn balance(&self) -> Money {
        self.inner.lock().await.balance()
    }

    pub async fn holdings(&self) -> BTreeMap<Symbol, i64> {
        self.inner.lock().await.holdings()
    }

    pub async fn portfolio_value(&self) -> Result<Money, Error> {
        self.inner.lock().await.portfolio_value()
    }

    pub async fn profit_loss(&self) -> Result<Money, Error> {
        self.inner.lock().await.profit_loss()
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.inner.lock().await.transactions()
    }

    /// Runs `f` with the account locked, for reads that must agree with each other.
    pub async fn with<R>(&self, f: impl FnOnce(&mut Account<P>) -> R) -> R {
        let mut account = self.inner.lock().await;
        f(&mut account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price_table::FixedPriceTable;

    fn shared(deposit: i64) -> SharedAccount<FixedPriceTable> {
        let mut account = Account::create("A1", FixedPriceTable::reference()).unwrap();
        account.deposit(Money::from(deposit)).unwrap();
        SharedAccount::new(account)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_withdrawals_never_overdraw() {
        let account = shared(100);

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let account = account.clone();
                tokio::spawn(async move { account.withdraw(Money::from(3)).await })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => accepted += 1,
                Err(Error::InsufficientFunds { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(accepted, 33);
        assert_eq!(account.balance().await, Money::from(1));
        assert_eq!(account.transactions().await.len(), 2 + 33);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_trades_keep_books_consistent() {
        let account = shared(10_000);

        let tasks: Vec<_> = (0..20)
            .map(|i| {
                let account = account.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        account.buy("tsla", 2).await
                    } else {
                        account.buy("GOOGL", 1).await
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let (balance, holdings) = account
            .with(|account| (account.balance(), account.holdings()))
            .await;
        assert_eq!(balance, Money::from(10_000 - 10 * 500 - 10 * 140));
        assert_eq!(holdings.get(&Symbol::new("TSLA")), Some(&20));
        assert_eq!(holdings.get(&Symbol::new("GOOGL")), Some(&10));
        assert_eq!(account.profit_loss().await.unwrap(), Money::ZERO);
        assert_eq!(
            account.portfolio_value().await.unwrap(),
            Money::from(10_000)
        );
    }
}
