pub mod config;
pub mod dlq;
pub mod domain;
pub mod engine;
pub mod ingestion;
pub mod price_table;
pub mod shared;
pub mod statement;

pub use domain::{Account, Error, Money, PriceOracle, Symbol, Transaction, TransactionKind};
pub use price_table::FixedPriceTable;
pub use shared::SharedAccount;
