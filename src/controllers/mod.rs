pub mod admin_controller;
pub mod forecast_controller;
pub mod leaderboard_controller;
pub mod market_controller;
pub mod user_controller;
