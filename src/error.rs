use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl StoreError {
    pub fn to_error_code(&self) -> &'static str {
        match self {
            StoreError::TaskNotFound(_) => "TASK_NOT_FOUND",
            StoreError::Storage(_) => "STORAGE_ERROR",
            StoreError::InvalidInput(_) => "INVALID_INPUT",
            StoreError::Io(_) => "IO_ERROR",
            StoreError::Json(_) => "JSON_ERROR",
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            code: self.to_error_code().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
