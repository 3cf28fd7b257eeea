// Crate-wide error type

use crate::search::SearchError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("An error has occurred while searching: {0}")]
    Search(#[from] SearchError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
