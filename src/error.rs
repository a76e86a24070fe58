use thiserror::Error;

pub type Result<T> = std::result::Result<T, SalvageError>;

#[derive(Debug, Error)]
pub enum SalvageError {
    #[error("Invalid status code for {key}: {value}")]
    InvalidStatus { key: String, value: String },

    #[error("Invalid flag for {key}: {value} (expected true or false)")]
    InvalidFlag { key: String, value: String },
}

impl SalvageError {
    pub fn invalid_status(key: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidStatus {
            key: key.into(),
            value: value.to_string(),
        }
    }

    pub fn invalid_flag(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidFlag {
            key: key.into(),
            value: value.into(),
        }
    }
}
