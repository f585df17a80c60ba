use std::path::Path;

use rusqlite::{params, params_from_iter, Connection};

use crate::error::WorktodoError;
use crate::models::{
    ChecklistItem, LogEntry, MoveDirection, Priority, Status, Task, TaskDraft, TaskFilter,
    TaskMeta,
};

use super::{now_utc, Store};

const TASK_COLUMNS: &str = "id, title, description, tags, owner, priority, status, due_date, \
                            created_by, created_at, updated_by, updated_at";
const ITEM_COLUMNS: &str =
    "id, task_id, text, is_done, position, created_by, created_at, updated_by, updated_at";

/// Embedded single-file backend.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, WorktodoError> {
        let conn = Connection::open(path)?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self, WorktodoError> {
        let conn = Connection::open_in_memory()?;
        configure_connection(&conn)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> Result<(), WorktodoError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                tags TEXT,
                owner TEXT NOT NULL,
                priority TEXT NOT NULL
                    CHECK (priority IN ('Low', 'Medium', 'High')),
                status TEXT NOT NULL
                    CHECK (status IN ('Todo', 'In Progress', 'Blocked', 'Done')),
                due_date TEXT,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_by TEXT,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS task_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                text TEXT NOT NULL,
                is_done INTEGER NOT NULL DEFAULT 0,
                position INTEGER NOT NULL,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_by TEXT,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS task_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                actor TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_updated ON tasks(updated_at);
            CREATE INDEX IF NOT EXISTS idx_items_task_position
                ON task_items(task_id, position);
            CREATE INDEX IF NOT EXISTS idx_logs_task ON task_logs(task_id);
            ",
        )?;
        Ok(())
    }
}

fn configure_connection(conn: &Connection) -> Result<(), WorktodoError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Inserts referencing tasks(id) fail the FK constraint when the task is
/// gone; surface that as not-found rather than a storage error.
fn map_fk_violation(e: rusqlite::Error, task_id: i64) -> WorktodoError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            WorktodoError::task_not_found(task_id)
        }
        _ => WorktodoError::from(e),
    }
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        tags: row.get(3)?,
        owner: row.get(4)?,
        priority: Priority::from_str(&row.get::<_, String>(5)?).unwrap_or(Priority::Medium),
        status: Status::from_str(&row.get::<_, String>(6)?).unwrap_or(Status::Todo),
        due_date: row.get(7)?,
        created_by: row.get(8)?,
        created_at: row.get(9)?,
        updated_by: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<ChecklistItem> {
    Ok(ChecklistItem {
        id: row.get(0)?,
        task_id: row.get(1)?,
        text: row.get(2)?,
        is_done: row.get(3)?,
        position: row.get(4)?,
        created_by: row.get(5)?,
        created_at: row.get(6)?,
        updated_by: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn row_to_log(row: &rusqlite::Row) -> rusqlite::Result<LogEntry> {
    Ok(LogEntry {
        id: row.get(0)?,
        task_id: row.get(1)?,
        actor: row.get(2)?,
        message: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl Store for SqliteStore {
    fn create_task(&mut self, draft: &TaskDraft) -> Result<i64, WorktodoError> {
        if draft.title.trim().is_empty() {
            return Err(WorktodoError::validation("Title is required."));
        }
        let now = now_utc();
        self.conn.execute(
            "INSERT INTO tasks (title, description, tags, owner, priority, status, due_date,
                                created_by, created_at, updated_by, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                draft.title,
                draft.description,
                draft.tags,
                draft.owner,
                draft.priority.as_str(),
                draft.status.as_str(),
                draft.due_date,
                draft.created_by,
                now,
                draft.created_by,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_task(&mut self, id: i64) -> Result<Task, WorktodoError> {
        self.conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => WorktodoError::task_not_found(id),
                _ => WorktodoError::from(e),
            })
    }

    fn list_tasks(&mut self, filter: &TaskFilter) -> Result<Vec<Task>, WorktodoError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if !filter.owners.is_empty() {
            let marks = vec!["?"; filter.owners.len()].join(",");
            clauses.push(format!("owner IN ({marks})"));
            values.extend(filter.owners.iter().cloned());
        }
        if !filter.statuses.is_empty() {
            let marks = vec!["?"; filter.statuses.len()].join(",");
            clauses.push(format!("status IN ({marks})"));
            values.extend(filter.statuses.iter().map(|s| s.as_str().to_string()));
        }
        if let Some(search) = &filter.search {
            let like = format!("%{search}%");
            clauses.push("(title LIKE ? OR description LIKE ? OR tags LIKE ?)".to_string());
            values.extend([like.clone(), like.clone(), like]);
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks {where_sql} ORDER BY updated_at DESC, id DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params_from_iter(values.iter()), row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn update_task_meta(
        &mut self,
        id: i64,
        meta: &TaskMeta,
        updated_by: &str,
    ) -> Result<(), WorktodoError> {
        if meta.title.trim().is_empty() {
            return Err(WorktodoError::validation("Title is required."));
        }
        let changed = self.conn.execute(
            "UPDATE tasks
             SET title = ?1, description = ?2, tags = ?3, owner = ?4, priority = ?5,
                 status = ?6, due_date = ?7, updated_by = ?8, updated_at = ?9
             WHERE id = ?10",
            params![
                meta.title,
                meta.description,
                meta.tags,
                meta.owner,
                meta.priority.as_str(),
                meta.status.as_str(),
                meta.due_date,
                updated_by,
                now_utc(),
                id
            ],
        )?;
        if changed == 0 {
            return Err(WorktodoError::task_not_found(id));
        }
        Ok(())
    }

    fn delete_task(&mut self, id: i64) -> Result<(), WorktodoError> {
        // Items and logs go with the task via ON DELETE CASCADE.
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn add_item(
        &mut self,
        task_id: i64,
        text: &str,
        created_by: &str,
    ) -> Result<i64, WorktodoError> {
        if text.trim().is_empty() {
            return Err(WorktodoError::validation("Item text cannot be empty."));
        }
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        let result = (|| -> Result<i64, WorktodoError> {
            let next_pos: i64 = self.conn.query_row(
                "SELECT COALESCE(MAX(position), 0) FROM task_items WHERE task_id = ?1",
                params![task_id],
                |row| row.get::<_, i64>(0),
            )? + 1;
            let now = now_utc();
            self.conn
                .execute(
                    "INSERT INTO task_items (task_id, text, is_done, position,
                                             created_by, created_at, updated_by, updated_at)
                     VALUES (?1, ?2, 0, ?3, ?4, ?5, ?6, ?7)",
                    params![task_id, text, next_pos, created_by, now, created_by, now],
                )
                .map_err(|e| map_fk_violation(e, task_id))?;
            Ok(self.conn.last_insert_rowid())
        })();
        match result {
            Ok(id) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(id)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    fn get_item(&mut self, id: i64) -> Result<ChecklistItem, WorktodoError> {
        self.conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM task_items WHERE id = ?1"),
                params![id],
                row_to_item,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => WorktodoError::item_not_found(id),
                _ => WorktodoError::from(e),
            })
    }

    fn list_items(&mut self, task_id: i64) -> Result<Vec<ChecklistItem>, WorktodoError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM task_items
             WHERE task_id = ?1
             ORDER BY position ASC, id ASC"
        ))?;
        let items = stmt
            .query_map(params![task_id], row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn update_item(&mut self, id: i64, text: &str, updated_by: &str) -> Result<(), WorktodoError> {
        if text.trim().is_empty() {
            return Err(WorktodoError::validation("Item text cannot be empty."));
        }
        let changed = self.conn.execute(
            "UPDATE task_items SET text = ?1, updated_by = ?2, updated_at = ?3 WHERE id = ?4",
            params![text, updated_by, now_utc(), id],
        )?;
        if changed == 0 {
            return Err(WorktodoError::item_not_found(id));
        }
        Ok(())
    }

    fn set_item_done(
        &mut self,
        id: i64,
        is_done: bool,
        updated_by: &str,
    ) -> Result<(), WorktodoError> {
        let changed = self.conn.execute(
            "UPDATE task_items SET is_done = ?1, updated_by = ?2, updated_at = ?3 WHERE id = ?4",
            params![is_done, updated_by, now_utc(), id],
        )?;
        if changed == 0 {
            return Err(WorktodoError::item_not_found(id));
        }
        Ok(())
    }

    fn delete_item(&mut self, id: i64) -> Result<(), WorktodoError> {
        self.conn
            .execute("DELETE FROM task_items WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn move_item(&mut self, id: i64, direction: MoveDirection) -> Result<(), WorktodoError> {
        // Both position writes must land together; a half-applied swap would
        // leave two items aliased to one position.
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        let result = (|| -> Result<(), WorktodoError> {
            let current: Option<(i64, i64)> = match self.conn.query_row(
                "SELECT task_id, position FROM task_items WHERE id = ?1",
                params![id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            ) {
                Ok(v) => Some(v),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            };
            let Some((task_id, pos)) = current else {
                return Ok(());
            };

            let neighbor_sql = match direction {
                MoveDirection::Up => {
                    "SELECT id, position FROM task_items
                     WHERE task_id = ?1 AND position < ?2
                     ORDER BY position DESC LIMIT 1"
                }
                MoveDirection::Down => {
                    "SELECT id, position FROM task_items
                     WHERE task_id = ?1 AND position > ?2
                     ORDER BY position ASC LIMIT 1"
                }
            };
            let neighbor: Option<(i64, i64)> =
                match self
                    .conn
                    .query_row(neighbor_sql, params![task_id, pos], |row| {
                        Ok((row.get(0)?, row.get(1)?))
                    }) {
                    Ok(v) => Some(v),
                    Err(rusqlite::Error::QueryReturnedNoRows) => None,
                    Err(e) => return Err(e.into()),
                };
            let Some((neighbor_id, neighbor_pos)) = neighbor else {
                return Ok(());
            };

            self.conn.execute(
                "UPDATE task_items SET position = ?1 WHERE id = ?2",
                params![neighbor_pos, id],
            )?;
            self.conn.execute(
                "UPDATE task_items SET position = ?1 WHERE id = ?2",
                params![pos, neighbor_id],
            )?;
            Ok(())
        })();
        match result {
            Ok(()) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(())
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }

    fn add_log(&mut self, task_id: i64, actor: &str, message: &str) -> Result<i64, WorktodoError> {
        self.conn
            .execute(
                "INSERT INTO task_logs (task_id, actor, message, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![task_id, actor, message, now_utc()],
            )
            .map_err(|e| map_fk_violation(e, task_id))?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_logs(&mut self, task_id: i64) -> Result<Vec<LogEntry>, WorktodoError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, actor, message, created_at
             FROM task_logs
             WHERE task_id = ?1
             ORDER BY id DESC",
        )?;
        let logs = stmt
            .query_map(params![task_id], row_to_log)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn store() -> SqliteStore {
        SqliteStore::in_memory().expect("in-memory store")
    }

    fn draft(title: &str, owner: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: None,
            tags: None,
            owner: owner.to_string(),
            priority: Priority::Medium,
            status: Status::Todo,
            due_date: None,
            created_by: owner.to_string(),
        }
    }

    fn positions(store: &mut SqliteStore, task_id: i64) -> Vec<i64> {
        store
            .list_items(task_id)
            .unwrap()
            .iter()
            .map(|i| i.position)
            .collect()
    }

    fn texts(store: &mut SqliteStore, task_id: i64) -> Vec<String> {
        store
            .list_items(task_id)
            .unwrap()
            .iter()
            .map(|i| i.text.clone())
            .collect()
    }

    #[test]
    fn create_task_sets_timestamps_and_actor() {
        let mut s = store();
        let id = s.create_task(&draft("Ship v2", "alice")).unwrap();
        let task = s.get_task(id).unwrap();
        assert_eq!(task.title, "Ship v2");
        assert_eq!(task.created_by, "alice");
        assert_eq!(task.updated_by.as_deref(), Some("alice"));
        assert!(task.created_at.ends_with(" UTC"));
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn create_task_rejects_empty_title() {
        let mut s = store();
        let err = s.create_task(&draft("   ", "alice")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn update_task_meta_bumps_actor_and_fails_on_unknown_id() {
        let mut s = store();
        let id = s.create_task(&draft("Ship v2", "alice")).unwrap();
        let meta = TaskMeta {
            title: "Ship v2.1".to_string(),
            description: Some("scope change".to_string()),
            tags: None,
            owner: "bob".to_string(),
            priority: Priority::High,
            status: Status::InProgress,
            due_date: Some("2026-09-01".to_string()),
        };
        s.update_task_meta(id, &meta, "bob").unwrap();
        let task = s.get_task(id).unwrap();
        assert_eq!(task.title, "Ship v2.1");
        assert_eq!(task.owner, "bob");
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.updated_by.as_deref(), Some("bob"));
        assert_eq!(task.created_by, "alice");

        let err = s.update_task_meta(9999, &meta, "bob").unwrap_err();
        assert_eq!(err.code, ErrorCode::TaskNotFound);
    }

    #[test]
    fn list_tasks_filters_are_conjunctive() {
        let mut s = store();
        let mut d1 = draft("Deploy pipeline", "alice");
        d1.description = Some("ship the release train".to_string());
        s.create_task(&d1).unwrap();
        let mut d2 = draft("Other", "bob");
        d2.status = Status::Blocked;
        s.create_task(&d2).unwrap();

        // no filters: everything
        let all = s.list_tasks(&TaskFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        // owner filter
        let alice_only = s
            .list_tasks(&TaskFilter {
                owners: vec!["alice".to_string()],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(alice_only.len(), 1);
        assert_eq!(alice_only[0].title, "Deploy pipeline");

        // status filter
        let blocked = s
            .list_tasks(&TaskFilter {
                statuses: vec![Status::Blocked],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(blocked.len(), 1);
        assert_eq!(blocked[0].title, "Other");

        // owner AND status must both match
        let none = s
            .list_tasks(&TaskFilter {
                owners: vec!["alice".to_string()],
                statuses: vec![Status::Blocked],
                ..Default::default()
            })
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_title_description_tags() {
        let mut s = store();
        s.create_task(&draft("Deploy pipeline", "alice")).unwrap();
        let mut tagged = draft("Other", "bob");
        tagged.tags = Some("infra, URGENT".to_string());
        s.create_task(&tagged).unwrap();

        let mut hit = |needle: &str| {
            s.list_tasks(&TaskFilter {
                search: Some(needle.to_string()),
                ..Default::default()
            })
            .unwrap()
        };

        let found = hit("PIPELINE");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Deploy pipeline");

        let found = hit("urgent");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Other");

        assert!(hit("nomatch").is_empty());
    }

    #[test]
    fn list_tasks_orders_by_updated_at_descending() {
        let mut s = store();
        let first = s.create_task(&draft("first", "alice")).unwrap();
        let _second = s.create_task(&draft("second", "alice")).unwrap();

        // Timestamps are second-precision; force a later update_at.
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let meta = TaskMeta {
            title: "first (edited)".to_string(),
            description: None,
            tags: None,
            owner: "alice".to_string(),
            priority: Priority::Medium,
            status: Status::Todo,
            due_date: None,
        };
        s.update_task_meta(first, &meta, "alice").unwrap();

        let all = s.list_tasks(&TaskFilter::default()).unwrap();
        assert_eq!(all[0].id, first);
    }

    #[test]
    fn items_append_at_max_position_plus_one() {
        let mut s = store();
        let t = s.create_task(&draft("Ship v2", "alice")).unwrap();
        s.add_item(t, "write spec", "alice").unwrap();
        let mid = s.add_item(t, "review", "alice").unwrap();
        s.add_item(t, "ship", "alice").unwrap();
        assert_eq!(positions(&mut s, t), vec![1, 2, 3]);

        // deleting the middle item leaves a hole that is never renumbered
        s.delete_item(mid).unwrap();
        let _ = s.add_item(t, "announce", "alice").unwrap();
        let pos = positions(&mut s, t);
        assert_eq!(pos, vec![1, 3, 4]);
        let unique: std::collections::HashSet<i64> = pos.iter().copied().collect();
        assert_eq!(unique.len(), pos.len());
    }

    #[test]
    fn add_item_round_trip() {
        let mut s = store();
        let t = s.create_task(&draft("Groceries", "alice")).unwrap();
        s.add_item(t, "buy milk", "alice").unwrap();
        let items = s.list_items(t).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "buy milk");
        assert!(!items[0].is_done);
        assert_eq!(items[0].position, 1);
    }

    #[test]
    fn add_item_rejects_empty_text_and_unknown_task() {
        let mut s = store();
        let t = s.create_task(&draft("Ship v2", "alice")).unwrap();
        let err = s.add_item(t, "  ", "alice").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let err = s.add_item(9999, "orphan", "alice").unwrap_err();
        assert_eq!(err.code, ErrorCode::TaskNotFound);
    }

    #[test]
    fn move_item_swaps_adjacent_positions() {
        let mut s = store();
        let t = s.create_task(&draft("Ship v2", "alice")).unwrap();
        s.add_item(t, "write spec", "alice").unwrap();
        let review = s.add_item(t, "review", "alice").unwrap();

        s.move_item(review, MoveDirection::Up).unwrap();
        assert_eq!(texts(&mut s, t), vec!["review", "write spec"]);
        assert_eq!(positions(&mut s, t), vec![1, 2]);
    }

    #[test]
    fn move_item_at_edges_is_a_no_op() {
        let mut s = store();
        let t = s.create_task(&draft("Ship v2", "alice")).unwrap();
        let top = s.add_item(t, "one", "alice").unwrap();
        s.add_item(t, "two", "alice").unwrap();
        let bottom = s.add_item(t, "three", "alice").unwrap();

        s.move_item(top, MoveDirection::Up).unwrap();
        s.move_item(bottom, MoveDirection::Down).unwrap();
        assert_eq!(texts(&mut s, t), vec!["one", "two", "three"]);

        // unknown id is also a silent no-op
        s.move_item(9999, MoveDirection::Up).unwrap();
    }

    #[test]
    fn move_never_duplicates_positions_across_a_sequence() {
        let mut s = store();
        let t = s.create_task(&draft("Ship v2", "alice")).unwrap();
        let ids: Vec<i64> = (0..5)
            .map(|n| s.add_item(t, &format!("step {n}"), "alice").unwrap())
            .collect();

        s.move_item(ids[4], MoveDirection::Up).unwrap();
        s.move_item(ids[4], MoveDirection::Up).unwrap();
        s.delete_item(ids[2]).unwrap();
        s.move_item(ids[0], MoveDirection::Down).unwrap();
        s.add_item(t, "late addition", "alice").unwrap();
        s.move_item(ids[1], MoveDirection::Down).unwrap();

        let pos = positions(&mut s, t);
        let unique: std::collections::HashSet<i64> = pos.iter().copied().collect();
        assert_eq!(unique.len(), pos.len(), "positions must stay unique: {pos:?}");
    }

    #[test]
    fn set_item_done_toggles_and_fails_on_unknown_id() {
        let mut s = store();
        let t = s.create_task(&draft("Ship v2", "alice")).unwrap();
        let item = s.add_item(t, "review", "alice").unwrap();

        s.set_item_done(item, true, "bob").unwrap();
        let got = s.get_item(item).unwrap();
        assert!(got.is_done);
        assert_eq!(got.updated_by.as_deref(), Some("bob"));

        s.set_item_done(item, false, "bob").unwrap();
        assert!(!s.get_item(item).unwrap().is_done);

        let err = s.set_item_done(9999, true, "bob").unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemNotFound);
    }

    #[test]
    fn delete_task_cascades_and_is_idempotent() {
        let mut s = store();
        let t = s.create_task(&draft("Ship v2", "alice")).unwrap();
        s.add_item(t, "write spec", "alice").unwrap();
        s.add_log(t, "alice", "Created task (status=Todo, owner=alice)")
            .unwrap();

        s.delete_task(t).unwrap();
        assert!(s.list_items(t).unwrap().is_empty());
        assert!(s.get_logs(t).unwrap().is_empty());
        assert_eq!(
            s.get_task(t).unwrap_err().code,
            ErrorCode::TaskNotFound
        );

        // deleting again is a no-op, not an error
        s.delete_task(t).unwrap();
    }

    #[test]
    fn delete_item_is_idempotent() {
        let mut s = store();
        let t = s.create_task(&draft("Ship v2", "alice")).unwrap();
        let item = s.add_item(t, "review", "alice").unwrap();
        s.delete_item(item).unwrap();
        s.delete_item(item).unwrap();
        assert!(s.list_items(t).unwrap().is_empty());
    }

    #[test]
    fn logs_are_returned_most_recent_first() {
        let mut s = store();
        let t = s.create_task(&draft("Ship v2", "alice")).unwrap();
        s.add_log(t, "alice", "first").unwrap();
        s.add_log(t, "bob", "second").unwrap();
        s.add_log(t, "alice", "third").unwrap();

        let logs = s.get_logs(t).unwrap();
        let messages: Vec<&str> = logs.iter().map(|l| l.message.as_str()).collect();
        assert_eq!(messages, vec!["third", "second", "first"]);
    }

    #[test]
    fn add_log_rejects_unknown_task() {
        let mut s = store();
        let err = s.add_log(9999, "alice", "orphan note").unwrap_err();
        assert_eq!(err.code, ErrorCode::TaskNotFound);
    }
}
