use serde_json::json;

use crate::cli::commands::LogCommands;
use crate::cli::resolve_actor;
use crate::error::WorktodoError;
use crate::output;
use crate::service::activity;
use crate::store::connection;

pub fn run(cmd: LogCommands, json_output: bool, actor_flag: Option<&str>) -> i32 {
    let result = match cmd {
        LogCommands::Add { task_id, message } => {
            run_add(task_id, &message, json_output, actor_flag)
        }
        LogCommands::List { task_id } => run_list(task_id, json_output),
    };
    match result {
        Ok(code) => code,
        Err(e) => crate::cli::fail(&e, json_output),
    }
}

fn run_add(
    task_id: i64,
    message: &str,
    json_output: bool,
    actor_flag: Option<&str>,
) -> Result<i32, WorktodoError> {
    let actor = resolve_actor(actor_flag)?;
    let mut store = connection::open_store()?;
    activity::record(store.as_mut(), task_id, &actor, message)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "logged": { "task_id": task_id }
            })))
            .unwrap()
        );
    } else {
        println!("Logged note on task #{task_id}");
    }
    Ok(0)
}

fn run_list(task_id: i64, json_output: bool) -> Result<i32, WorktodoError> {
    let mut store = connection::open_store()?;
    let logs = activity::history(store.as_mut(), task_id)?;

    if json_output {
        let logs_json: Vec<_> = logs.iter().map(output::json::log_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "logs": logs_json
            })))
            .unwrap()
        );
    } else {
        output::text::print_logs(&logs);
    }
    Ok(0)
}
