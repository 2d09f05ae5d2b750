pub mod withdrawal_processor;

pub use withdrawal_processor::WithdrawalProcessor;
