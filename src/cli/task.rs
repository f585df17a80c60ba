use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::cli::resolve_actor;
use crate::config::Config;
use crate::error::WorktodoError;
use crate::models::{Priority, Status, TaskMeta};
use crate::output;
use crate::service::{activity, checklist, tasks};
use crate::store::connection;

pub fn run(cmd: TaskCommands, json_output: bool, actor_flag: Option<&str>) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            title,
            description,
            tags,
            owner,
            priority,
            status,
            due,
        } => run_add(
            &title,
            description,
            tags,
            owner,
            &priority,
            &status,
            due,
            json_output,
            actor_flag,
        ),
        TaskCommands::List {
            owner,
            status,
            search,
        } => run_list(owner, status, search.as_deref(), json_output),
        TaskCommands::Show { id } => run_show(id, json_output),
        TaskCommands::Edit {
            id,
            title,
            description,
            tags,
            owner,
            priority,
            status,
            due,
            clear_due,
            note,
        } => run_edit(
            id,
            title,
            description,
            tags,
            owner,
            priority,
            status,
            due,
            clear_due,
            note,
            json_output,
            actor_flag,
        ),
        TaskCommands::Delete { id } => run_delete(id, json_output),
    };
    match result {
        Ok(code) => code,
        Err(e) => crate::cli::fail(&e, json_output),
    }
}

pub(crate) fn parse_priority(s: &str) -> Result<Priority, WorktodoError> {
    Priority::from_str(s).ok_or_else(|| {
        WorktodoError::validation(format!(
            "Unknown priority '{s}' (expected Low, Medium, or High)"
        ))
    })
}

pub(crate) fn parse_status(s: &str) -> Result<Status, WorktodoError> {
    Status::from_str(s).ok_or_else(|| {
        WorktodoError::validation(format!(
            "Unknown status '{s}' (expected Todo, In Progress, Blocked, or Done)"
        ))
    })
}

/// Advisory only: an unknown owner gets a warning, never a failure.
fn warn_unknown_owner(config: &Config, owner: &str) {
    if !config.is_known_user(owner) {
        eprintln!("Warning: owner '{owner}' is not in the configured users list.");
    }
}

#[allow(clippy::too_many_arguments)]
fn run_add(
    title: &str,
    description: Option<String>,
    tags: Option<String>,
    owner: Option<String>,
    priority: &str,
    status: &str,
    due: Option<String>,
    json_output: bool,
    actor_flag: Option<&str>,
) -> Result<i32, WorktodoError> {
    let actor = resolve_actor(actor_flag)?;
    let priority = parse_priority(priority)?;
    let status = parse_status(status)?;
    let owner = owner.unwrap_or_else(|| actor.clone());

    let config = connection::load_config()?;
    warn_unknown_owner(&config, &owner);

    let meta = TaskMeta {
        title: title.to_string(),
        description,
        tags,
        owner,
        priority,
        status,
        due_date: due,
    };
    let mut store = connection::open_store()?;
    let task = tasks::create(store.as_mut(), &meta, &actor)?;
    activity::record(
        store.as_mut(),
        task.id,
        &actor,
        &format!(
            "Created task (status={}, owner={})",
            task.status.as_str(),
            task.owner
        ),
    )?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Created task #{}: {}", task.id, task.title);
    }
    Ok(0)
}

fn run_list(
    owners: Vec<String>,
    statuses: Vec<String>,
    search: Option<&str>,
    json_output: bool,
) -> Result<i32, WorktodoError> {
    let statuses = statuses
        .iter()
        .map(|s| parse_status(s))
        .collect::<Result<Vec<_>, _>>()?;

    let mut store = connection::open_store()?;
    let found = tasks::list(store.as_mut(), owners, statuses, search)?;

    // checklist progress per task for the list view
    let mut rows = Vec::with_capacity(found.len());
    for t in found {
        let items = checklist::list(store.as_mut(), t.id)?;
        let done = items.iter().filter(|i| i.is_done).count();
        rows.push((t, done, items.len()));
    }

    if json_output {
        let tasks_json: Vec<_> = rows
            .iter()
            .map(|(t, done, total)| {
                let mut v = output::json::task_json(t);
                v["items"] = json!({ "done": done, "total": total });
                v
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "tasks": tasks_json
            })))
            .unwrap()
        );
    } else {
        output::text::print_task_list(&rows);
    }
    Ok(0)
}

fn run_show(id: i64, json_output: bool) -> Result<i32, WorktodoError> {
    let mut store = connection::open_store()?;
    let task = tasks::get(store.as_mut(), id)?;
    let items = checklist::list(store.as_mut(), id)?;
    let logs = activity::history(store.as_mut(), id)?;
    let done = items.iter().filter(|i| i.is_done).count();

    if json_output {
        let items_json: Vec<_> = items.iter().map(output::json::item_json).collect();
        let logs_json: Vec<_> = logs.iter().map(output::json::log_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&task),
                "items": items_json,
                "logs": logs_json
            })))
            .unwrap()
        );
    } else {
        output::text::print_task(&task);
        println!(
            "\nChecklist ({}):",
            output::text::progress_label(done, items.len())
        );
        output::text::print_items(&items);
        println!("\nActivity log:");
        output::text::print_logs(&logs);
    }
    Ok(0)
}

#[allow(clippy::too_many_arguments)]
fn run_edit(
    id: i64,
    title: Option<String>,
    description: Option<String>,
    tags: Option<String>,
    owner: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    due: Option<String>,
    clear_due: bool,
    note: Option<String>,
    json_output: bool,
    actor_flag: Option<&str>,
) -> Result<i32, WorktodoError> {
    let actor = resolve_actor(actor_flag)?;
    let config = connection::load_config()?;
    let mut store = connection::open_store()?;
    let current = tasks::get(store.as_mut(), id)?;

    let meta = TaskMeta {
        title: title.unwrap_or(current.title),
        description: description.or(current.description),
        tags: tags.or(current.tags),
        owner: owner.unwrap_or(current.owner),
        priority: match priority {
            Some(p) => parse_priority(&p)?,
            None => current.priority,
        },
        status: match status {
            Some(s) => parse_status(&s)?,
            None => current.status,
        },
        due_date: if clear_due {
            None
        } else {
            due.or(current.due_date)
        },
    };
    warn_unknown_owner(&config, &meta.owner);

    let task = tasks::update_meta(store.as_mut(), id, &meta, &actor)?;

    let note = note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Updated task meta".to_string());
    activity::record(store.as_mut(), id, &actor, &note)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_json(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Saved task #{}: {}", task.id, task.title);
    }
    Ok(0)
}

fn run_delete(id: i64, json_output: bool) -> Result<i32, WorktodoError> {
    let mut store = connection::open_store()?;
    tasks::delete(store.as_mut(), id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "deleted": { "id": id }
            })))
            .unwrap()
        );
    } else {
        println!("Deleted task #{id}");
    }
    Ok(0)
}
