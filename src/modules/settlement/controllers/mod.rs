pub mod settlement_controller;
