use crate::error::WorktodoError;
use crate::models::LogEntry;
use crate::store::Store;

/// Append-only. There is deliberately no update or delete here; entries
/// disappear only when their task does.
pub fn record(
    store: &mut dyn Store,
    task_id: i64,
    actor: &str,
    message: &str,
) -> Result<(), WorktodoError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(WorktodoError::validation("Log message cannot be empty."));
    }
    store.add_log(task_id, actor, message)?;
    Ok(())
}

pub fn history(store: &mut dyn Store, task_id: i64) -> Result<Vec<LogEntry>, WorktodoError> {
    store.get_logs(task_id)
}
