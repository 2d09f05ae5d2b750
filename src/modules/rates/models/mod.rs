pub mod commission_settings;

pub use commission_settings::{CommissionSettings, RateSet};
