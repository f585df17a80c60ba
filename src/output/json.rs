use serde_json::{json, Value};

use crate::error::WorktodoError;
use crate::models::{ChecklistItem, LogEntry, Task};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &WorktodoError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn task_json(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "description": t.description,
        "tags": t.tags,
        "owner": t.owner,
        "priority": t.priority.as_str(),
        "status": t.status.as_str(),
        "due_date": t.due_date,
        "created_by": t.created_by,
        "created_at": t.created_at,
        "updated_by": t.updated_by,
        "updated_at": t.updated_at
    })
}

pub fn item_json(i: &ChecklistItem) -> Value {
    json!({
        "id": i.id,
        "task_id": i.task_id,
        "text": i.text,
        "is_done": i.is_done,
        "position": i.position,
        "created_by": i.created_by,
        "created_at": i.created_at,
        "updated_by": i.updated_by,
        "updated_at": i.updated_at
    })
}

pub fn log_json(l: &LogEntry) -> Value {
    json!({
        "id": l.id,
        "task_id": l.task_id,
        "actor": l.actor,
        "message": l.message,
        "created_at": l.created_at
    })
}
