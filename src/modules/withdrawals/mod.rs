pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{WithdrawalRequest, WithdrawalStatus};
pub use services::WithdrawalProcessor;
