use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

/// Columns every uploaded review table must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = ["product_name", "review"];

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to load model artifact: {0}")]
    ModelLoad(String),

    #[error("No file provided")]
    MissingFile,

    #[error("CSV must contain columns: {}", format_column_list(&REQUIRED_COLUMNS))]
    Schema { missing: BTreeSet<String> },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    /// Carries the path that was requested; the message stays generic.
    #[error("Not found")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Stable, machine-readable error category sent alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ModelLoad,
    MissingFile,
    SchemaError,
    ParseError,
    InferenceError,
    UploadError,
    Config,
    NotFound,
    Internal,
}

impl AppError {
    pub fn schema<I, S>(missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AppError::Schema {
            missing: missing.into_iter().map(Into::into).collect(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ModelLoad(_) => ErrorKind::ModelLoad,
            AppError::MissingFile => ErrorKind::MissingFile,
            AppError::Schema { .. } => ErrorKind::SchemaError,
            AppError::Parse(_) => ErrorKind::ParseError,
            AppError::Inference(_) => ErrorKind::InferenceError,
            AppError::Upload(_) => ErrorKind::UploadError,
            AppError::Config(_) => ErrorKind::Config,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Render(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the caller can fix the problem by changing the upload.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::MissingFile | AppError::Schema { .. } | AppError::Upload(_)
        )
    }

    pub fn missing_columns(&self) -> Option<&BTreeSet<String>> {
        match self {
            AppError::Schema { missing } => Some(missing),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Renders a column list the way users saw it in earlier releases: `['a', 'b']`.
pub fn format_column_list(columns: &[&str]) -> String {
    let quoted = columns
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", quoted)
}

pub type Result<T> = std::result::Result<T, AppError>;
