pub mod ledger_writer;
pub mod settlement_calculator;

pub use ledger_writer::{LedgerWriter, PostSaleRequest};
pub use settlement_calculator::SettlementCalculator;
