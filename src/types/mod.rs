pub mod auth_types;
pub mod forecast_types;
pub mod market_types;
