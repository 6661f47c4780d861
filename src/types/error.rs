use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid amount '{value}': {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Chain read failed ({call}): {message}")]
    Read { call: String, message: String },

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Decimal error: {0}")]
    Decimal(#[from] rust_decimal::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VaultError>;

impl VaultError {
    pub fn invalid_amount(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn read(call: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            call: call.into(),
            message: message.into(),
        }
    }
}
