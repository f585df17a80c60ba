use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WorktodoError;

/// Workspace configuration, stored as `.worktodo/config.json`.
///
/// `database_url` selects the networked PostgreSQL backend; when absent the
/// embedded SQLite file next to the config is used. `users` is the advisory
/// known-username list (credential material lives elsewhere and is never
/// read here).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub users: Vec<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, WorktodoError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| WorktodoError::storage(format!("failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| WorktodoError::storage(format!("invalid config {}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<(), WorktodoError> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| WorktodoError::storage(e.to_string()))?;
        fs::write(path, raw)
            .map_err(|e| WorktodoError::storage(format!("failed to write {}: {e}", path.display())))
    }

    /// Effective database URL. WORKTODO_DATABASE_URL overrides the file so
    /// credentials can stay out of the workspace.
    pub fn effective_database_url(&self) -> Option<String> {
        if let Ok(url) = env::var("WORKTODO_DATABASE_URL") {
            let url = url.trim().to_string();
            if !url.is_empty() {
                return Some(url);
            }
        }
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
    }

    pub fn is_known_user(&self, username: &str) -> bool {
        self.users.is_empty() || self.users.iter().any(|u| u == username)
    }
}
