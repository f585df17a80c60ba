use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    TaskNotFound,
    ItemNotFound,
    ValidationError,
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::StorageError => "STORAGE_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct WorktodoError {
    pub code: ErrorCode,
    pub message: String,
}

impl WorktodoError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "worktodo is not initialized here. Run `worktodo init` first.",
        )
    }

    pub fn task_not_found(id: i64) -> Self {
        Self::new(ErrorCode::TaskNotFound, format!("Task not found: {id}"))
    }

    pub fn item_not_found(id: i64) -> Self {
        Self::new(ErrorCode::ItemNotFound, format!("Item not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }
}

impl From<rusqlite::Error> for WorktodoError {
    fn from(e: rusqlite::Error) -> Self {
        Self::storage(e.to_string())
    }
}

impl From<postgres::Error> for WorktodoError {
    fn from(e: postgres::Error) -> Self {
        Self::storage(e.to_string())
    }
}
