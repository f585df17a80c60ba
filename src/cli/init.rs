use serde_json::json;

use crate::store::connection;

pub fn run(json_output: bool) -> i32 {
    match connection::init_workspace() {
        Ok(dir) => {
            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&crate::output::json::success(json!({
                        "path": dir.to_string_lossy()
                    })))
                    .unwrap()
                );
            } else {
                println!("Initialized worktodo at {}", dir.display());
            }
            0
        }
        Err(e) => crate::cli::fail(&e, json_output),
    }
}
