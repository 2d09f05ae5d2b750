pub mod audit;
pub mod balances;
pub mod rates;
pub mod settlement;
pub mod withdrawals;
