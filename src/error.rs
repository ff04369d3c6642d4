use thiserror::Error;

/// Failures that stop a grading run. No scored table is produced once one of
/// these is returned.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("missing columns in uploaded CSV: {0:?}")]
    MissingFields(Vec<String>),
    #[error("columns appear more than once in uploaded CSV: {0:?}")]
    DuplicateColumns(Vec<String>),
    #[error("row {row}: column '{column}' is not numeric: '{value}'")]
    MalformedInput {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("dataset contains no campaign rows")]
    EmptyDataset,
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the text-generation collaborator. These never invalidate the
/// scored table.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("API error [{status}]: {message}")]
    ApiError { status: u16, message: String },
    #[error("text-generation service returned no text")]
    EmptyResponse,
}
