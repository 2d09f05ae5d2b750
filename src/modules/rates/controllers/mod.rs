pub mod rate_controller;
