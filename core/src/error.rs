use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid dialogue catalog: {reason}")]
    InvalidCatalog { reason: String },
}

pub type GameResult<T> = Result<T, GameError>;
