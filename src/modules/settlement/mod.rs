pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{LedgerTransaction, Settlement, TransactionStatus};
pub use services::{LedgerWriter, PostSaleRequest, SettlementCalculator};
