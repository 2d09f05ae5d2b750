pub mod withdrawal_request;

pub use withdrawal_request::{WithdrawalRequest, WithdrawalStatus};
