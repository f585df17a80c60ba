pub mod connection;
pub mod postgres;
pub mod sqlite;

pub use connection::*;

use chrono::Utc;

use crate::error::WorktodoError;
use crate::models::{ChecklistItem, LogEntry, MoveDirection, Task, TaskDraft, TaskFilter, TaskMeta};

/// Current time in the storage timestamp format, second precision.
/// Generated in Rust rather than in SQL so both backends agree exactly.
pub fn now_utc() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Durable store for tasks, checklist items, and activity logs.
///
/// Implemented by the embedded SQLite backend and the networked PostgreSQL
/// backend with identical semantics. Placeholder style, boolean
/// representation, and id generation are backend details; callers never
/// branch on the engine.
pub trait Store {
    fn create_task(&mut self, draft: &TaskDraft) -> Result<i64, WorktodoError>;
    fn get_task(&mut self, id: i64) -> Result<Task, WorktodoError>;
    /// Conjunction of owner set, status set, and case-insensitive substring
    /// search over title/description/tags. Ordered by `updated_at` DESC with
    /// `id` DESC as the tie-break at second precision.
    fn list_tasks(&mut self, filter: &TaskFilter) -> Result<Vec<Task>, WorktodoError>;
    /// Full overwrite of the editable fields; bumps `updated_by`/`updated_at`.
    fn update_task_meta(
        &mut self,
        id: i64,
        meta: &TaskMeta,
        updated_by: &str,
    ) -> Result<(), WorktodoError>;
    /// Cascades to items and logs. Idempotent: unknown ids are a no-op.
    fn delete_task(&mut self, id: i64) -> Result<(), WorktodoError>;

    /// Appends at `max(position) + 1` within the task, starting at 1.
    fn add_item(&mut self, task_id: i64, text: &str, created_by: &str)
        -> Result<i64, WorktodoError>;
    fn get_item(&mut self, id: i64) -> Result<ChecklistItem, WorktodoError>;
    /// Ordered `(position ASC, id ASC)`; the id tie-break keeps output stable
    /// if positions ever collide.
    fn list_items(&mut self, task_id: i64) -> Result<Vec<ChecklistItem>, WorktodoError>;
    fn update_item(&mut self, id: i64, text: &str, updated_by: &str)
        -> Result<(), WorktodoError>;
    fn set_item_done(
        &mut self,
        id: i64,
        is_done: bool,
        updated_by: &str,
    ) -> Result<(), WorktodoError>;
    /// Idempotent: unknown ids are a no-op.
    fn delete_item(&mut self, id: i64) -> Result<(), WorktodoError>;
    /// Swaps positions with the adjacent item in the given direction, inside
    /// a transaction. No neighbor (list edge) or unknown id: silent no-op.
    fn move_item(&mut self, id: i64, direction: MoveDirection) -> Result<(), WorktodoError>;

    fn add_log(&mut self, task_id: i64, actor: &str, message: &str)
        -> Result<i64, WorktodoError>;
    /// Most recent first (by id descending).
    fn get_logs(&mut self, task_id: i64) -> Result<Vec<LogEntry>, WorktodoError>;
}
