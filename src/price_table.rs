use std::collections::HashMap;
use std::io::Read;

use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::{Error, Money, PriceOracle, Symbol};

/// Price oracle backed by a fixed in-memory table.
#[derive(Debug, Clone, Default)]
pub struct FixedPriceTable {
    prices: HashMap<Symbol, Money>,
}

impl FixedPriceTable {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
        }
    }

    /// AAPL 170.00, TSLA 250.00, GOOGL 140.00.
    pub fn reference() -> Self {
        let mut table = Self::new();
        table.prices.insert(Symbol::new("AAPL"), Money::new(dec!(170.00)));
        table.prices.insert(Symbol::new("TSLA"), Money::new(dec!(250.00)));
        table.prices.insert(Symbol::new("GOOGL"), Money::new(dec!(140.00)));
        table
    }

    pub fn with_price(mut self, symbol: &str, price: Money) -> Result<Self, Error> {
        let symbol = Symbol::new(symbol);
        if symbol.is_empty() {
            return Err(Error::InvalidArgument("price symbol cannot be empty".to_string()));
        }
        if !price.is_positive() {
            return Err(Error::InvalidArgument(format!(
                "price for {} must be positive, got {}",
                symbol, price
            )));
        }
        self.prices.insert(symbol, price);
        Ok(self)
    }

    /// Reads a `symbol,price` CSV. Later rows override earlier ones.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        rdr.deserialize::<PriceRow>()
            .try_fold(Self::new(), |table, row| {
                let row = row.map_err(|e| {
                    Error::Ingestion(format!("CSV deserialization error: {}", e))
                })?;
                table.with_price(row.symbol.as_str(), row.price)
            })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    symbol: Symbol,
    price: Money,
}

impl PriceOracle for FixedPriceTable {
    fn lookup_price(&self, symbol: &Symbol) -> Result<Money, Error> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| Error::UnknownSymbol(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_prices() {
        let table = FixedPriceTable::reference();
        assert_eq!(
            table.lookup_price(&Symbol::new("AAPL")).unwrap(),
            Money::from(170)
        );
        assert_eq!(
            table.lookup_price(&Symbol::new("tSlA")).unwrap(),
            Money::from(250)
        );
        assert_eq!(
            table.lookup_price(&Symbol::new("googl")).unwrap(),
            Money::from(140)
        );
        assert!(matches!(
            table.lookup_price(&Symbol::new("XYZ")),
            Err(Error::UnknownSymbol(s)) if s == "XYZ"
        ));
    }

    #[test]
    fn loads_from_csv() {
        let data = "symbol, price\nmsft, 410.25\nAAPL, 1\nMSFT, 411.5\n";
        let table = FixedPriceTable::from_csv(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup_price(&Symbol::new("MSFT")).unwrap(),
            "411.5".parse::<Money>().unwrap()
        );
        assert!(table.lookup_price(&Symbol::new("TSLA")).is_err());
    }

    #[test]
    fn rejects_bad_prices() {
        let negative = "symbol,price\nAAPL,-1\n";
        assert!(matches!(
            FixedPriceTable::from_csv(negative.as_bytes()),
            Err(Error::InvalidArgument(_))
        ));
        let garbage = "symbol,price\nAAPL,lots\n";
        assert!(matches!(
            FixedPriceTable::from_csv(garbage.as_bytes()),
            Err(Error::Ingestion(_))
        ));
    }
}
