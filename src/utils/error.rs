use thiserror::Error;

#[derive(Error, Debug)]
pub enum FipeError {
    #[error("Informe pelo menos um codigo FIPE no formato 000000-0.")]
    NoValidCodes,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration file error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Batch processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, FipeError>;
