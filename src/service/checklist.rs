use crate::error::WorktodoError;
use crate::models::{ChecklistItem, MoveDirection};
use crate::store::Store;

/// Task existence is the store's foreign-key reality; this layer only
/// normalizes text.
pub fn add(
    store: &mut dyn Store,
    task_id: i64,
    text: &str,
    actor: &str,
) -> Result<ChecklistItem, WorktodoError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WorktodoError::validation("Item text cannot be empty."));
    }
    let id = store.add_item(task_id, text, actor)?;
    store.get_item(id)
}

pub fn get(store: &mut dyn Store, id: i64) -> Result<ChecklistItem, WorktodoError> {
    store.get_item(id)
}

pub fn list(store: &mut dyn Store, task_id: i64) -> Result<Vec<ChecklistItem>, WorktodoError> {
    store.list_items(task_id)
}

pub fn rename(
    store: &mut dyn Store,
    id: i64,
    text: &str,
    actor: &str,
) -> Result<ChecklistItem, WorktodoError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(WorktodoError::validation("Item text cannot be empty."));
    }
    store.update_item(id, text, actor)?;
    store.get_item(id)
}

pub fn set_done(
    store: &mut dyn Store,
    id: i64,
    is_done: bool,
    actor: &str,
) -> Result<ChecklistItem, WorktodoError> {
    store.set_item_done(id, is_done, actor)?;
    store.get_item(id)
}

pub fn move_item(
    store: &mut dyn Store,
    id: i64,
    direction: MoveDirection,
) -> Result<(), WorktodoError> {
    store.move_item(id, direction)
}

pub fn remove(store: &mut dyn Store, id: i64) -> Result<(), WorktodoError> {
    store.delete_item(id)
}
