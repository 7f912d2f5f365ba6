pub mod account;
pub mod command;
pub mod error;
pub mod money;
pub mod symbol;
pub mod traits;
pub mod transaction;

pub use account::Account;
pub use command::Command;
pub use error::Error;
pub use money::Money;
pub use symbol::Symbol;
pub use traits::{CommandStream, DeadLetterQueue, PriceOracle, StatementOutput};
pub use transaction::{Transaction, TransactionKind};
