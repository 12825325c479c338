//! Error types for the custom fields condition engine

use thiserror::Error;

/// Main error type for the custom fields condition engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldsError {
    #[error("Invalid condition type: {0}")]
    InvalidConditionType(String),

    #[error("Unsupported comparison operator \"{operator}\" for condition type \"{condition_type}\"")]
    UnsupportedOperator {
        operator: String,
        condition_type: String,
    },

    #[error("Malformed condition: {0}")]
    MalformedCondition(String),

    #[error("Invalid relation type {0}. The rule should be one of the following: \"AND\", \"OR\"")]
    InvalidRelation(String),

    #[error("Condition cannot be expressed in foreign form: {0}")]
    UnserializableCondition(String),

    #[error("Invalid container type: {0}")]
    InvalidContainerType(String),

    #[error("Duplicate container id: {0}")]
    DuplicateContainer(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<serde_json::Error> for FieldsError {
    fn from(err: serde_json::Error) -> Self {
        FieldsError::DeserializationError(err.to_string())
    }
}

/// Result type alias for the custom fields condition engine
pub type Result<T> = std::result::Result<T, FieldsError>;
