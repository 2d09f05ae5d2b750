//! Vale Cashback Settlement & Ledger Core
//!
//! Rate resolution, settlement calculation, atomic ledger posting and
//! withdrawal processing for a multi-tenant cashback platform.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::balances;
pub use modules::rates;
pub use modules::settlement;
pub use modules::withdrawals;
