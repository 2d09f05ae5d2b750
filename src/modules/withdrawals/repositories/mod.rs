pub mod withdrawal_repository;

pub use withdrawal_repository::WithdrawalRepository;
