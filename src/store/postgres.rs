use postgres::error::SqlState;
use postgres::types::ToSql;
use postgres::{Client, NoTls, Row};

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

/// Networked relational backend. Same observable semantics as the embedded
/// store; the dialect differences (BIGSERIAL ids, native booleans, ILIKE,
/// RETURNING) stay inside this file.
pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    pub fn connect(url: &str) -> Result<Self, WorktodoError> {
        let client = Client::connect(url, NoTls)?;
        Ok(Self { client })
    }

    pub fn migrate(&mut self) -> Result<(), WorktodoError> {
        self.client.batch_execute(
            "
            CREATE TABLE IF NOT EXISTS tasks (
                id BIGSERIAL PRIMARY KEY,
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
                id BIGSERIAL PRIMARY KEY,
                task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                text TEXT NOT NULL,
                is_done BOOLEAN NOT NULL DEFAULT FALSE,
                position BIGINT NOT NULL,
                created_by TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_by TEXT,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS task_logs (
                id BIGSERIAL PRIMARY KEY,
                task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
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

fn map_fk_violation(e: postgres::Error, task_id: i64) -> WorktodoError {
    if e.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
        WorktodoError::task_not_found(task_id)
    } else {
        WorktodoError::from(e)
    }
}

fn row_to_task(row: &Row) -> Task {
    Task {
        id: row.get(0),
        title: row.get(1),
        description: row.get(2),
        tags: row.get(3),
        owner: row.get(4),
        priority: Priority::from_str(row.get::<_, &str>(5)).unwrap_or(Priority::Medium),
        status: Status::from_str(row.get::<_, &str>(6)).unwrap_or(Status::Todo),
        due_date: row.get(7),
        created_by: row.get(8),
        created_at: row.get(9),
        updated_by: row.get(10),
        updated_at: row.get(11),
    }
}

fn row_to_item(row: &Row) -> ChecklistItem {
    ChecklistItem {
        id: row.get(0),
        task_id: row.get(1),
        text: row.get(2),
        is_done: row.get(3),
        position: row.get(4),
        created_by: row.get(5),
        created_at: row.get(6),
        updated_by: row.get(7),
        updated_at: row.get(8),
    }
}

fn row_to_log(row: &Row) -> LogEntry {
    LogEntry {
        id: row.get(0),
        task_id: row.get(1),
        actor: row.get(2),
        message: row.get(3),
        created_at: row.get(4),
    }
}

impl Store for PostgresStore {
    fn create_task(&mut self, draft: &TaskDraft) -> Result<i64, WorktodoError> {
        if draft.title.trim().is_empty() {
            return Err(WorktodoError::validation("Title is required."));
        }
        let now = now_utc();
        let row = self.client.query_one(
            "INSERT INTO tasks (title, description, tags, owner, priority, status, due_date,
                                created_by, created_at, updated_by, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
            &[
                &draft.title,
                &draft.description,
                &draft.tags,
                &draft.owner,
                &draft.priority.as_str(),
                &draft.status.as_str(),
                &draft.due_date,
                &draft.created_by,
                &now,
                &draft.created_by,
                &now,
            ],
        )?;
        Ok(row.get(0))
    }

    fn get_task(&mut self, id: i64) -> Result<Task, WorktodoError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        let row = self.client.query_opt(sql.as_str(), &[&id])?;
        match row {
            Some(row) => Ok(row_to_task(&row)),
            None => Err(WorktodoError::task_not_found(id)),
        }
    }

    fn list_tasks(&mut self, filter: &TaskFilter) -> Result<Vec<Task>, WorktodoError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if !filter.owners.is_empty() {
            let marks: Vec<String> = filter
                .owners
                .iter()
                .enumerate()
                .map(|(n, _)| format!("${}", values.len() + n + 1))
                .collect();
            clauses.push(format!("owner IN ({})", marks.join(",")));
            values.extend(filter.owners.iter().cloned());
        }
        if !filter.statuses.is_empty() {
            let marks: Vec<String> = filter
                .statuses
                .iter()
                .enumerate()
                .map(|(n, _)| format!("${}", values.len() + n + 1))
                .collect();
            clauses.push(format!("status IN ({})", marks.join(",")));
            values.extend(filter.statuses.iter().map(|s| s.as_str().to_string()));
        }
        if let Some(search) = &filter.search {
            let like = format!("%{search}%");
            let base = values.len();
            clauses.push(format!(
                "(title ILIKE ${} OR description ILIKE ${} OR tags ILIKE ${})",
                base + 1,
                base + 2,
                base + 3
            ));
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
        let params: Vec<&(dyn ToSql + Sync)> =
            values.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
        let rows = self.client.query(sql.as_str(), &params)?;
        Ok(rows.iter().map(row_to_task).collect())
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
        let changed = self.client.execute(
            "UPDATE tasks
             SET title = $1, description = $2, tags = $3, owner = $4, priority = $5,
                 status = $6, due_date = $7, updated_by = $8, updated_at = $9
             WHERE id = $10",
            &[
                &meta.title,
                &meta.description,
                &meta.tags,
                &meta.owner,
                &meta.priority.as_str(),
                &meta.status.as_str(),
                &meta.due_date,
                &updated_by,
                &now_utc(),
                &id,
            ],
        )?;
        if changed == 0 {
            return Err(WorktodoError::task_not_found(id));
        }
        Ok(())
    }

    fn delete_task(&mut self, id: i64) -> Result<(), WorktodoError> {
        self.client
            .execute("DELETE FROM tasks WHERE id = $1", &[&id])?;
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
        let mut tx = self.client.transaction()?;
        let next_pos: i64 = tx
            .query_one(
                "SELECT COALESCE(MAX(position), 0) FROM task_items WHERE task_id = $1",
                &[&task_id],
            )?
            .get::<_, i64>(0)
            + 1;
        let now = now_utc();
        let row = tx
            .query_one(
                "INSERT INTO task_items (task_id, text, is_done, position,
                                         created_by, created_at, updated_by, updated_at)
                 VALUES ($1, $2, FALSE, $3, $4, $5, $6, $7)
                 RETURNING id",
                &[&task_id, &text, &next_pos, &created_by, &now, &created_by, &now],
            )
            .map_err(|e| map_fk_violation(e, task_id))?;
        let id = row.get(0);
        tx.commit()?;
        Ok(id)
    }

    fn get_item(&mut self, id: i64) -> Result<ChecklistItem, WorktodoError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM task_items WHERE id = $1");
        let row = self.client.query_opt(sql.as_str(), &[&id])?;
        match row {
            Some(row) => Ok(row_to_item(&row)),
            None => Err(WorktodoError::item_not_found(id)),
        }
    }

    fn list_items(&mut self, task_id: i64) -> Result<Vec<ChecklistItem>, WorktodoError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM task_items
             WHERE task_id = $1
             ORDER BY position ASC, id ASC"
        );
        let rows = self.client.query(sql.as_str(), &[&task_id])?;
        Ok(rows.iter().map(row_to_item).collect())
    }

    fn update_item(&mut self, id: i64, text: &str, updated_by: &str) -> Result<(), WorktodoError> {
        if text.trim().is_empty() {
            return Err(WorktodoError::validation("Item text cannot be empty."));
        }
        let changed = self.client.execute(
            "UPDATE task_items SET text = $1, updated_by = $2, updated_at = $3 WHERE id = $4",
            &[&text, &updated_by, &now_utc(), &id],
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
        let changed = self.client.execute(
            "UPDATE task_items SET is_done = $1, updated_by = $2, updated_at = $3 WHERE id = $4",
            &[&is_done, &updated_by, &now_utc(), &id],
        )?;
        if changed == 0 {
            return Err(WorktodoError::item_not_found(id));
        }
        Ok(())
    }

    fn delete_item(&mut self, id: i64) -> Result<(), WorktodoError> {
        self.client
            .execute("DELETE FROM task_items WHERE id = $1", &[&id])?;
        Ok(())
    }

    fn move_item(&mut self, id: i64, direction: MoveDirection) -> Result<(), WorktodoError> {
        // Both position writes commit together or the transaction rolls back.
        let mut tx = self.client.transaction()?;

        let current = tx.query_opt(
            "SELECT task_id, position FROM task_items WHERE id = $1",
            &[&id],
        )?;
        let Some(current) = current else {
            return Ok(());
        };
        let task_id: i64 = current.get(0);
        let pos: i64 = current.get(1);

        let neighbor_sql = match direction {
            MoveDirection::Up => {
                "SELECT id, position FROM task_items
                 WHERE task_id = $1 AND position < $2
                 ORDER BY position DESC LIMIT 1"
            }
            MoveDirection::Down => {
                "SELECT id, position FROM task_items
                 WHERE task_id = $1 AND position > $2
                 ORDER BY position ASC LIMIT 1"
            }
        };
        let neighbor = tx.query_opt(neighbor_sql, &[&task_id, &pos])?;
        let Some(neighbor) = neighbor else {
            return Ok(());
        };
        let neighbor_id: i64 = neighbor.get(0);
        let neighbor_pos: i64 = neighbor.get(1);

        tx.execute(
            "UPDATE task_items SET position = $1 WHERE id = $2",
            &[&neighbor_pos, &id],
        )?;
        tx.execute(
            "UPDATE task_items SET position = $1 WHERE id = $2",
            &[&pos, &neighbor_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn add_log(&mut self, task_id: i64, actor: &str, message: &str) -> Result<i64, WorktodoError> {
        let row = self
            .client
            .query_one(
                "INSERT INTO task_logs (task_id, actor, message, created_at)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id",
                &[&task_id, &actor, &message, &now_utc()],
            )
            .map_err(|e| map_fk_violation(e, task_id))?;
        Ok(row.get(0))
    }

    fn get_logs(&mut self, task_id: i64) -> Result<Vec<LogEntry>, WorktodoError> {
        let rows = self.client.query(
            "SELECT id, task_id, actor, message, created_at
             FROM task_logs
             WHERE task_id = $1
             ORDER BY id DESC",
            &[&task_id],
        )?;
        Ok(rows.iter().map(row_to_log).collect())
    }
}
