pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{Balance, BalanceKind};
