pub mod balance_controller;
