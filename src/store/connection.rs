use std::env;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::WorktodoError;

use super::postgres::PostgresStore;
use super::sqlite::SqliteStore;
use super::Store;

pub const DATA_DIR: &str = ".worktodo";
pub const DB_FILE: &str = "worktodo.db";
pub const CONFIG_FILE: &str = "config.json";

/// Find the workspace root by walking up from the current directory.
pub fn find_workspace_root() -> Result<PathBuf, WorktodoError> {
    let mut dir = env::current_dir().map_err(|e| WorktodoError::storage(e.to_string()))?;
    loop {
        if dir.join(DATA_DIR).is_dir() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(WorktodoError::not_initialized());
        }
    }
}

pub fn data_dir() -> Result<PathBuf, WorktodoError> {
    Ok(find_workspace_root()?.join(DATA_DIR))
}

pub fn db_path() -> Result<PathBuf, WorktodoError> {
    Ok(data_dir()?.join(DB_FILE))
}

pub fn config_path() -> Result<PathBuf, WorktodoError> {
    Ok(data_dir()?.join(CONFIG_FILE))
}

pub fn load_config() -> Result<Config, WorktodoError> {
    Config::load(&config_path()?)
}

/// Open the configured backend. Returns NOT_INITIALIZED when no workspace
/// exists (or the embedded database file is missing).
pub fn open_store() -> Result<Box<dyn Store>, WorktodoError> {
    let config = load_config()?;
    match config.effective_database_url() {
        Some(url) => Ok(Box::new(PostgresStore::connect(&url)?)),
        None => {
            let path = db_path()?;
            if !path.exists() {
                return Err(WorktodoError::not_initialized());
            }
            Ok(Box::new(SqliteStore::open(&path)?))
        }
    }
}

/// Initialize a workspace in the current directory: create the data
/// directory, write a default config if absent, and run migrations on the
/// configured backend. Idempotent.
pub fn init_workspace() -> Result<PathBuf, WorktodoError> {
    let cwd = env::current_dir().map_err(|e| WorktodoError::storage(e.to_string()))?;
    let dir = cwd.join(DATA_DIR);
    fs::create_dir_all(&dir).map_err(|e| WorktodoError::storage(e.to_string()))?;

    let config_file = dir.join(CONFIG_FILE);
    if !config_file.exists() {
        Config::default().save(&config_file)?;
    }
    let config = Config::load(&config_file)?;

    match config.effective_database_url() {
        Some(url) => {
            let mut store = PostgresStore::connect(&url)?;
            store.migrate()?;
        }
        None => {
            let store = SqliteStore::open(&dir.join(DB_FILE))?;
            store.migrate()?;
        }
    }
    Ok(dir)
}
