use serde_json::json;

use crate::cli::commands::ItemCommands;
use crate::cli::resolve_actor;
use crate::error::{ErrorCode, WorktodoError};
use crate::models::MoveDirection;
use crate::output;
use crate::service::{activity, checklist};
use crate::store::connection;

pub fn run(cmd: ItemCommands, json_output: bool, actor_flag: Option<&str>) -> i32 {
    let result = match cmd {
        ItemCommands::Add { task_id, text } => run_add(task_id, &text, json_output, actor_flag),
        ItemCommands::List { task_id } => run_list(task_id, json_output),
        ItemCommands::Edit { id, text } => run_edit(id, &text, json_output, actor_flag),
        ItemCommands::Check { id } => run_set_done(id, true, json_output, actor_flag),
        ItemCommands::Uncheck { id } => run_set_done(id, false, json_output, actor_flag),
        ItemCommands::Move { id, direction } => run_move(id, &direction, json_output),
        ItemCommands::Delete { id } => run_delete(id, json_output, actor_flag),
    };
    match result {
        Ok(code) => code,
        Err(e) => crate::cli::fail(&e, json_output),
    }
}

fn run_add(
    task_id: i64,
    text: &str,
    json_output: bool,
    actor_flag: Option<&str>,
) -> Result<i32, WorktodoError> {
    let actor = resolve_actor(actor_flag)?;
    let mut store = connection::open_store()?;
    let item = checklist::add(store.as_mut(), task_id, text, &actor)?;
    activity::record(
        store.as_mut(),
        task_id,
        &actor,
        &format!("Added item: {}", item.text),
    )?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "item": output::json::item_json(&item)
            })))
            .unwrap()
        );
    } else {
        println!("Added item #{} to task #{}", item.id, task_id);
    }
    Ok(0)
}

fn run_list(task_id: i64, json_output: bool) -> Result<i32, WorktodoError> {
    let mut store = connection::open_store()?;
    let items = checklist::list(store.as_mut(), task_id)?;

    if json_output {
        let items_json: Vec<_> = items.iter().map(output::json::item_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "items": items_json
            })))
            .unwrap()
        );
    } else {
        output::text::print_items(&items);
    }
    Ok(0)
}

fn run_edit(
    id: i64,
    text: &str,
    json_output: bool,
    actor_flag: Option<&str>,
) -> Result<i32, WorktodoError> {
    let actor = resolve_actor(actor_flag)?;
    let mut store = connection::open_store()?;
    let item = checklist::rename(store.as_mut(), id, text, &actor)?;
    activity::record(
        store.as_mut(),
        item.task_id,
        &actor,
        &format!("Edited item: {}", item.text),
    )?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "item": output::json::item_json(&item)
            })))
            .unwrap()
        );
    } else {
        println!("Saved item #{}", item.id);
    }
    Ok(0)
}

fn run_set_done(
    id: i64,
    is_done: bool,
    json_output: bool,
    actor_flag: Option<&str>,
) -> Result<i32, WorktodoError> {
    let actor = resolve_actor(actor_flag)?;
    let mut store = connection::open_store()?;
    let item = checklist::set_done(store.as_mut(), id, is_done, &actor)?;
    let state = if is_done { "done" } else { "not done" };
    activity::record(
        store.as_mut(),
        item.task_id,
        &actor,
        &format!("Toggled item {state}: {}", item.text),
    )?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "item": output::json::item_json(&item)
            })))
            .unwrap()
        );
    } else {
        println!("Item #{} marked {state}", item.id);
    }
    Ok(0)
}

fn run_move(id: i64, direction: &str, json_output: bool) -> Result<i32, WorktodoError> {
    let direction = MoveDirection::from_str(direction)
        .ok_or_else(|| WorktodoError::validation("Direction must be 'up' or 'down'."))?;
    let mut store = connection::open_store()?;
    checklist::move_item(store.as_mut(), id, direction)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "moved": { "id": id, "direction": direction.as_str() }
            })))
            .unwrap()
        );
    } else {
        println!("Moved item #{id} {}", direction.as_str());
    }
    Ok(0)
}

fn run_delete(
    id: i64,
    json_output: bool,
    actor_flag: Option<&str>,
) -> Result<i32, WorktodoError> {
    let actor = resolve_actor(actor_flag)?;
    let mut store = connection::open_store()?;

    // Fetch first so the log can name the item. An already-deleted id still
    // succeeds (the delete is a no-op) and simply writes no log.
    match checklist::get(store.as_mut(), id) {
        Ok(item) => {
            checklist::remove(store.as_mut(), id)?;
            activity::record(
                store.as_mut(),
                item.task_id,
                &actor,
                &format!("Deleted item: {}", item.text),
            )?;
        }
        Err(e) if e.code == ErrorCode::ItemNotFound => {
            checklist::remove(store.as_mut(), id)?;
        }
        Err(e) => return Err(e),
    }

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "deleted": { "id": id }
            })))
            .unwrap()
        );
    } else {
        println!("Deleted item #{id}");
    }
    Ok(0)
}
