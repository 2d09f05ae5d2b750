pub mod withdrawal_controller;
