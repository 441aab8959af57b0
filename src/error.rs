use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("No {kind} found matching '{key}'")]
    NotFound { kind: &'static str, key: String },

    #[error("Invalid record: {0}")]
    Validation(String),

    #[error("Database error: {message}")]
    Database { message: String },
}

impl FarmError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        FarmError::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FarmError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, FarmError>;
