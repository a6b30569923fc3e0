pub mod forecasts;
pub mod markets;
pub mod users;

use thiserror::Error;

/// Store-level failures: database errors plus the business-rule violations
/// the handlers surface as 4xx responses.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user already exists")]
    UserExists,
    #[error("user not found")]
    UserNotFound,
    #[error("market not found")]
    MarketNotFound,
    #[error("market is not active")]
    MarketNotActive,
    #[error("market is already resolved")]
    AlreadyResolved,
    #[error("insufficient tokens")]
    InsufficientTokens,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
