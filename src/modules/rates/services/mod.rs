pub mod rate_resolver;

pub use rate_resolver::RateResolver;
