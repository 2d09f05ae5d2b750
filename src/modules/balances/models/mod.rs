pub mod balance;

pub use balance::{Balance, BalanceKind};
