use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt save: {reason}")]
    CorruptSave { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptSave { reason: reason.into() }
    }
}

pub type SimResult<T> = Result<T, SimError>;
