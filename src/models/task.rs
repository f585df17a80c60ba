use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Blocked,
    Done,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::Blocked => "Blocked",
            Self::Done => "Done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Some(Self::Todo),
            "in progress" | "in_progress" | "in-progress" => Some(Self::InProgress),
            "blocked" => Some(Self::Blocked),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub owner: String,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<String>,
    pub created_by: String,
    pub created_at: String,
    pub updated_by: Option<String>,
    pub updated_at: String,
}

/// Fields for task creation. Timestamps and id are assigned by the store.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub owner: String,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<String>,
    pub created_by: String,
}

/// Editable fields for a full-overwrite meta update.
#[derive(Debug, Clone)]
pub struct TaskMeta {
    pub title: String,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub owner: String,
    pub priority: Priority,
    pub status: Status,
    pub due_date: Option<String>,
}

/// Conjunctive task filter. Empty owner/status sets mean no restriction.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub owners: Vec<String>,
    pub statuses: Vec<Status>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_canonical_and_cli_forms() {
        assert_eq!(Status::from_str("Todo"), Some(Status::Todo));
        assert_eq!(Status::from_str("In Progress"), Some(Status::InProgress));
        assert_eq!(Status::from_str("in_progress"), Some(Status::InProgress));
        assert_eq!(Status::from_str("in-progress"), Some(Status::InProgress));
        assert_eq!(Status::from_str("BLOCKED"), Some(Status::Blocked));
        assert_eq!(Status::from_str("done"), Some(Status::Done));
        assert_eq!(Status::from_str("archived"), None);
    }

    #[test]
    fn status_round_trips_through_as_str() {
        for s in [Status::Todo, Status::InProgress, Status::Blocked, Status::Done] {
            assert_eq!(Status::from_str(s.as_str()), Some(s));
        }
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!(Priority::from_str("low"), Some(Priority::Low));
        assert_eq!(Priority::from_str("Medium"), Some(Priority::Medium));
        assert_eq!(Priority::from_str("HIGH"), Some(Priority::High));
        assert_eq!(Priority::from_str("urgent"), None);
    }
}
