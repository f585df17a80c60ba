use crate::models::{ChecklistItem, LogEntry, Task};

pub fn progress_label(done: usize, total: usize) -> String {
    if total == 0 {
        "-".to_string()
    } else {
        format!("{done}/{total}")
    }
}

pub fn print_task(t: &Task) {
    println!("Task #{}: {}", t.id, t.title);
    if let Some(ref desc) = t.description {
        println!("  Description: {desc}");
    }
    if let Some(ref tags) = t.tags {
        println!("  Tags: {tags}");
    }
    println!("  Owner: {}", t.owner);
    println!("  Priority: {}", t.priority.as_str());
    println!("  Status: {}", t.status.as_str());
    if let Some(ref due) = t.due_date {
        println!("  Due: {due}");
    }
    println!("  Created: {} by {}", t.created_at, t.created_by);
    match t.updated_by {
        Some(ref by) => println!("  Updated: {} by {by}", t.updated_at),
        None => println!("  Updated: {}", t.updated_at),
    }
}

pub fn print_task_list(rows: &[(Task, usize, usize)]) {
    if rows.is_empty() {
        println!("No tasks match your filters.");
        return;
    }
    for (t, done, total) in rows {
        let due = t.due_date.as_deref().unwrap_or("-");
        let tags = t.tags.as_deref().unwrap_or("");
        println!(
            "  #{} [{}] {} (@{}, {}) due={} items={}{}",
            t.id,
            t.status.as_str(),
            t.title,
            t.owner,
            t.priority.as_str(),
            due,
            progress_label(*done, *total),
            if tags.is_empty() {
                String::new()
            } else {
                format!(" tags={tags}")
            }
        );
    }
}

pub fn print_items(items: &[ChecklistItem]) {
    if items.is_empty() {
        println!("No items yet.");
        return;
    }
    for it in items {
        let mark = if it.is_done { "x" } else { " " };
        println!("  {}. [{}] {} (#{})", it.position, mark, it.text, it.id);
    }
}

pub fn print_logs(logs: &[LogEntry]) {
    if logs.is_empty() {
        println!("No logs yet.");
        return;
    }
    for lg in logs {
        println!("  {} - {}: {}", lg.created_at, lg.actor, lg.message);
    }
}
