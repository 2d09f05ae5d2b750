pub mod transaction;

pub use transaction::{LedgerTransaction, Settlement, TransactionStatus};
