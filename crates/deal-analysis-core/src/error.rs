use thiserror::Error;

#[derive(Debug, Error)]
pub enum DealAnalysisError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DealAnalysisError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        DealAnalysisError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DealAnalysisError {
    fn from(e: serde_json::Error) -> Self {
        DealAnalysisError::SerializationError(e.to_string())
    }
}
