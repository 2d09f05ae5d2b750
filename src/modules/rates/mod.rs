pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CommissionSettings, RateSet};
