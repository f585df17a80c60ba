use serde_json::json;

use crate::error::WorktodoError;
use crate::store::connection;

pub fn run(json_output: bool) -> i32 {
    let result = (|| -> Result<i32, WorktodoError> {
        let config = connection::load_config()?;
        let mut users = config.users.clone();
        users.sort();

        if json_output {
            println!(
                "{}",
                serde_json::to_string_pretty(&crate::output::json::success(json!({
                    "users": users
                })))
                .unwrap()
            );
        } else if users.is_empty() {
            println!("No users configured.");
        } else {
            for u in &users {
                println!("  {u}");
            }
        }
        Ok(0)
    })();
    match result {
        Ok(code) => code,
        Err(e) => crate::cli::fail(&e, json_output),
    }
}
