use chrono::NaiveDate;

use crate::error::WorktodoError;
use crate::models::{Status, Task, TaskDraft, TaskFilter, TaskMeta};
use crate::store::Store;

fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn validate_due_date(due: Option<&str>) -> Result<Option<String>, WorktodoError> {
    match normalize_text(due) {
        None => Ok(None),
        Some(d) => {
            NaiveDate::parse_from_str(&d, "%Y-%m-%d").map_err(|_| {
                WorktodoError::validation(format!("Due date must be YYYY-MM-DD, got '{d}'"))
            })?;
            Ok(Some(d))
        }
    }
}

/// Trim free-text fields and validate the required ones. Empty-after-trim
/// description/tags are stored as absent.
fn normalized(meta: &TaskMeta) -> Result<TaskMeta, WorktodoError> {
    let title = meta.title.trim().to_string();
    if title.is_empty() {
        return Err(WorktodoError::validation("Title is required."));
    }
    let owner = meta.owner.trim().to_string();
    if owner.is_empty() {
        return Err(WorktodoError::validation("Owner is required."));
    }
    Ok(TaskMeta {
        title,
        description: normalize_text(meta.description.as_deref()),
        tags: normalize_text(meta.tags.as_deref()),
        owner,
        priority: meta.priority,
        status: meta.status,
        due_date: validate_due_date(meta.due_date.as_deref())?,
    })
}

pub fn create(store: &mut dyn Store, meta: &TaskMeta, actor: &str) -> Result<Task, WorktodoError> {
    let meta = normalized(meta)?;
    let draft = TaskDraft {
        title: meta.title,
        description: meta.description,
        tags: meta.tags,
        owner: meta.owner,
        priority: meta.priority,
        status: meta.status,
        due_date: meta.due_date,
        created_by: actor.to_string(),
    };
    let id = store.create_task(&draft)?;
    store.get_task(id)
}

pub fn get(store: &mut dyn Store, id: i64) -> Result<Task, WorktodoError> {
    store.get_task(id)
}

pub fn list(
    store: &mut dyn Store,
    owners: Vec<String>,
    statuses: Vec<Status>,
    search: Option<&str>,
) -> Result<Vec<Task>, WorktodoError> {
    let filter = TaskFilter {
        owners,
        statuses,
        search: normalize_text(search),
    };
    store.list_tasks(&filter)
}

pub fn update_meta(
    store: &mut dyn Store,
    id: i64,
    meta: &TaskMeta,
    actor: &str,
) -> Result<Task, WorktodoError> {
    let meta = normalized(meta)?;
    store.update_task_meta(id, &meta, actor)?;
    store.get_task(id)
}

pub fn delete(store: &mut dyn Store, id: i64) -> Result<(), WorktodoError> {
    store.delete_task(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::models::Priority;
    use crate::store::sqlite::SqliteStore;

    fn meta(title: &str) -> TaskMeta {
        TaskMeta {
            title: title.to_string(),
            description: None,
            tags: None,
            owner: "alice".to_string(),
            priority: Priority::Medium,
            status: Status::Todo,
            due_date: None,
        }
    }

    #[test]
    fn create_trims_free_text_and_drops_empty_fields() {
        let mut s = SqliteStore::in_memory().unwrap();
        let mut m = meta("  Ship v2  ");
        m.description = Some("   ".to_string());
        m.tags = Some("  infra, release  ".to_string());
        let task = create(&mut s, &m, "alice").unwrap();
        assert_eq!(task.title, "Ship v2");
        assert_eq!(task.description, None);
        assert_eq!(task.tags.as_deref(), Some("infra, release"));
    }

    #[test]
    fn create_rejects_whitespace_title() {
        let mut s = SqliteStore::in_memory().unwrap();
        let err = create(&mut s, &meta("   "), "alice").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn due_date_must_be_iso_format() {
        let mut s = SqliteStore::in_memory().unwrap();
        let mut m = meta("Ship v2");
        m.due_date = Some("next tuesday".to_string());
        let err = create(&mut s, &m, "alice").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        m.due_date = Some("2026-09-01".to_string());
        let task = create(&mut s, &m, "alice").unwrap();
        assert_eq!(task.due_date.as_deref(), Some("2026-09-01"));
    }

    #[test]
    fn list_drops_blank_search_text() {
        let mut s = SqliteStore::in_memory().unwrap();
        create(&mut s, &meta("Ship v2"), "alice").unwrap();
        let found = list(&mut s, Vec::new(), Vec::new(), Some("   ")).unwrap();
        assert_eq!(found.len(), 1);
    }
}
