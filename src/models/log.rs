use serde::{Deserialize, Serialize};

/// Append-only activity log entry. Entries are never updated or deleted
/// individually; they disappear only when their task is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub task_id: i64,
    pub actor: String,
    pub message: String,
    pub created_at: String,
}
