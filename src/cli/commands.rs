use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "worktodo",
    version = VERSION,
    about = "Internal task/checklist tracker with a per-task activity log",
    after_help = "\
NOTE:
  Data lives in ./.worktodo (found by walking up from the current
  directory). Run `worktodo init` before any other command. A database_url
  in config.json (or WORKTODO_DATABASE_URL) selects PostgreSQL; otherwise
  an embedded SQLite file is used. Both behave identically.

ACTOR:
  Mutating commands need an identity: --actor <username> or WORKTODO_ACTOR.
  Identity is supplied by the caller (login happens elsewhere) and is not
  verified here.

EXIT CODES:
  0  Success
  1  Error (validation, not found, storage)

BEHAVIOR NOTES:
  `task delete` and `item delete` are idempotent; other mutations on an
  unknown id are errors. `item move` at a list edge is a silent no-op.
  Every other mutation writes one activity log entry on the task."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Acting username (falls back to WORKTODO_ACTOR)
    #[arg(long, global = true)]
    pub actor: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a worktodo workspace in the current directory
    Init,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Checklist items on a task
    #[command(subcommand)]
    Item(ItemCommands),

    /// Per-task activity log (append-only)
    #[command(subcommand)]
    Log(LogCommands),

    /// List known users from configuration
    Users,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a task
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated free-text tags
        #[arg(long)]
        tags: Option<String>,
        /// Owner username (defaults to the actor)
        #[arg(long)]
        owner: Option<String>,
        /// Low, Medium, or High
        #[arg(long, default_value = "Medium")]
        priority: String,
        /// Todo, "In Progress", Blocked, or Done
        #[arg(long, default_value = "Todo")]
        status: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks, most recently updated first
    List {
        /// Restrict to these owners (repeatable)
        #[arg(long)]
        owner: Vec<String>,
        /// Restrict to these statuses (repeatable)
        #[arg(long)]
        status: Vec<String>,
        /// Case-insensitive substring match on title/description/tags
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a task with its checklist and activity log
    Show {
        id: i64,
    },
    /// Edit a task (unspecified fields keep their current values)
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Clear the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        /// Log note describing the change (default: "Updated task meta")
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a task and its items and logs (idempotent)
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Append a checklist item to a task
    Add {
        task_id: i64,
        text: String,
    },
    /// List a task's checklist in display order
    List {
        task_id: i64,
    },
    /// Replace an item's text
    Edit {
        id: i64,
        text: String,
    },
    /// Mark an item done
    Check {
        id: i64,
    },
    /// Mark an item not done
    Uncheck {
        id: i64,
    },
    /// Move an item one step (swaps with its neighbor; no-op at edges)
    Move {
        id: i64,
        /// up or down
        direction: String,
    },
    /// Delete an item (idempotent)
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum LogCommands {
    /// Append a log entry to a task
    Add {
        task_id: i64,
        message: String,
    },
    /// Show a task's log, most recent first
    List {
        task_id: i64,
    },
}
