pub mod commands;
pub mod init;
pub mod item;
pub mod log;
pub mod task;
pub mod users;

pub use commands::*;

use std::env;

use crate::error::WorktodoError;

/// Resolve the acting identity: --actor flag, then WORKTODO_ACTOR. The core
/// never authenticates; whoever invokes us says who they are.
pub fn resolve_actor(flag: Option<&str>) -> Result<String, WorktodoError> {
    if let Some(actor) = flag {
        let actor = actor.trim();
        if !actor.is_empty() {
            return Ok(actor.to_string());
        }
    }
    if let Ok(actor) = env::var("WORKTODO_ACTOR") {
        let actor = actor.trim().to_string();
        if !actor.is_empty() {
            return Ok(actor);
        }
    }
    Err(WorktodoError::validation(
        "No actor identity. Pass --actor <username> or set WORKTODO_ACTOR.",
    ))
}

pub fn fail(e: &WorktodoError, json_output: bool) -> i32 {
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&crate::output::json::error(e)).unwrap()
        );
    } else {
        eprintln!("Error: {}", e.message);
    }
    1
}
