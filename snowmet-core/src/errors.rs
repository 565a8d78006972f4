use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnowMetError {
    #[error("{0}")]
    Error(String),
    #[error("Field '{0}' does not exist on the field store")]
    MissingField(String),
    #[error("Field '{name}' has {found} values but the store holds {expected} nodes")]
    CardinalityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Invalid start datetime '{value}': {reason}. Expected format 'YYYY-MM-DD HH:MM:SS'")]
    InvalidDatetime { value: String, reason: String },
    #[error("Parameter '{name}' must be a positive, finite number, got {value}")]
    InvalidParameter { name: String, value: f64 },
    #[error("Field '{name}' must be strictly positive, found {value} at node {node}")]
    NonPositiveField {
        name: String,
        node: usize,
        value: f64,
    },
    #[error("Variable '{0}' is not registered")]
    UnknownVariable(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Component dependency cycle detected involving component {0}")]
    DependencyCycle(String),
}

/// Convenience type for `Result<T, SnowMetError>`.
pub type SnowMetResult<T> = Result<T, SnowMetError>;

impl From<toml::de::Error> for SnowMetError {
    fn from(value: toml::de::Error) -> Self {
        SnowMetError::Config(value.to_string())
    }
}
