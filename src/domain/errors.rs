use thiserror::Error;

/// Errors raised while validating a raw request row, before any encoding runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Feature row must be a JSON object")]
    NotAnObject,

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Field {field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Field {field} must be a finite number")]
    NonFinite { field: &'static str },
}

/// Errors related to fitting or applying the feature encoder
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodingError {
    #[error("Unknown feature column: {column}")]
    UnknownColumn { column: String },

    #[error("Column {column} is not a {expected} feature")]
    WrongKind {
        column: String,
        expected: &'static str,
    },

    #[error("Column {column} is listed more than once")]
    DuplicateColumn { column: String },

    #[error("Cannot fit encoder on an empty training set")]
    EmptyTrainingSet,

    #[error("Column spec produces no feature columns")]
    EmptySchema,

    #[error("Encoded row has {actual} columns, model expects {expected}")]
    ColumnCountMismatch { expected: usize, actual: usize },
}

/// Errors surfaced by training, loading and prediction.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Failed to load pipeline state from {path}: {reason}")]
    StateLoad { path: String, reason: String },

    #[error("Model inference failed: {reason}")]
    Inference { reason: String },

    #[error("Model training failed: {reason}")]
    Training { reason: String },
}

impl PipelineError {
    /// True when the caller sent a bad row; everything else is a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_formatting() {
        let err = ValidationError::InvalidType {
            field: "Year",
            expected: "an integer",
        };
        assert_eq!(err.to_string(), "Field Year must be an integer");
    }

    #[test]
    fn test_client_error_classification() {
        let client: PipelineError = ValidationError::MissingField { field: "Brand" }.into();
        assert!(client.is_client_error());
        assert!(client.to_string().contains("Brand"));

        let server = PipelineError::Inference {
            reason: "boom".to_string(),
        };
        assert!(!server.is_client_error());

        let encoding: PipelineError = EncodingError::EmptyTrainingSet.into();
        assert!(!encoding.is_client_error());
    }
}
