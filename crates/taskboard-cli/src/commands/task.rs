//! Task management commands for CLI.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Subcommand;
use taskboard_core::task::{active_task, PRIORITY_NORMAL};
use taskboard_core::{CoreError, Task, TaskStore, ValidationError};

use crate::parse;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Required work time in minutes
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        duration: u32,
        /// Priority from 1 (high) to 3 (low)
        #[arg(long, default_value_t = PRIORITY_NORMAL, value_parser = clap::value_parser!(u8).range(1..=3))]
        priority: u8,
        /// Earliest start time (HH:MM)
        #[arg(long, value_parser = parse::time_of_day)]
        earliest: Option<NaiveTime>,
        /// Latest end time (HH:MM)
        #[arg(long, value_parser = parse::time_of_day)]
        latest: Option<NaiveTime>,
        /// Schedule after all inflexible tasks
        #[arg(long)]
        flexible: bool,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// First day the task may be scheduled (default: today)
        #[arg(long, value_parser = parse::date)]
        date: Option<NaiveDate>,
        /// ID of a task that must finish first (repeatable)
        #[arg(long = "depends-on")]
        depends_on: Vec<String>,
        /// Print the created task as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tasks
    List {
        /// Show every task regardless of date and completion
        #[arg(long, conflicts_with_all = ["overdue", "completed"])]
        all: bool,
        /// Show only overdue tasks
        #[arg(long, conflicts_with = "completed")]
        overdue: bool,
        /// Show only completed tasks
        #[arg(long)]
        completed: bool,
        /// Show tasks due on or before this date (default: today)
        #[arg(long, value_parser = parse::date)]
        date: Option<NaiveDate>,
        /// Show detailed task information
        #[arg(long)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start a work session
    Start {
        /// Task ID (default: first open task due today)
        id: Option<String>,
        /// Start time (YYYY-MM-DD HH:MM, default: now)
        #[arg(long, value_parser = parse::datetime)]
        at: Option<NaiveDateTime>,
    },
    /// Stop the active work session
    Stop {
        /// Stop time (YYYY-MM-DD HH:MM, default: now)
        #[arg(long, value_parser = parse::datetime)]
        at: Option<NaiveDateTime>,
        /// Also mark the task as completed
        #[arg(long)]
        complete: bool,
    },
    /// Mark a task as completed
    Complete {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

fn not_found(id: &str) -> CoreError {
    ValidationError::NotFound {
        kind: "Task",
        id: id.to_string(),
    }
    .into()
}

fn load_task(store: &TaskStore, id: &str) -> Result<Task, CoreError> {
    store.get_task(id)?.ok_or_else(|| not_found(id))
}

/// Status glyph and suffix for the list view.
fn status(task: &Task, today: NaiveDate) -> (&'static str, String) {
    if task.is_completed {
        ("✓", String::new())
    } else if let Some(started) = task.active_session_start {
        (">", format!(" (ACTIVE since {})", started.format("%Y-%m-%d %H:%M")))
    } else if task.is_overdue(today) {
        ("!", String::new())
    } else {
        (" ", String::new())
    }
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn print_details(task: &Task) {
    println!("    ID: {}", task.id);
    println!("    Priority: {}", task.priority);
    if task.is_completed {
        println!("    Time Taken: {} mins", task.time_spent().num_minutes());
    } else {
        println!("    Estimated: {} mins", task.duration_minutes);
    }
    println!("    Scheduled Date: {}", fmt_opt(task.scheduled_date));
    println!("    Earliest Start: {}", fmt_opt(task.earliest_start_time.map(|t| t.format("%H:%M"))));
    println!("    Latest End: {}", fmt_opt(task.latest_end_time.map(|t| t.format("%H:%M"))));
    println!("    Flexible: {}", if task.flexible { "Yes" } else { "No" });
    if !task.depends_on.is_empty() {
        println!("    Depends On: {}", task.depends_on.join(", "));
    }
    println!("    Description: {}", task.description.as_deref().unwrap_or("-"));
    println!();
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = TaskStore::open()?;
    let now = parse::now();
    let today = now.date();

    match action {
        TaskAction::Add {
            title,
            duration,
            priority,
            earliest,
            latest,
            flexible,
            description,
            date,
            depends_on,
            json,
        } => {
            if let (Some(start), Some(end)) = (earliest, latest) {
                if end <= start {
                    return Err(ValidationError::InvalidValue {
                        field: "latest".into(),
                        message: format!("{end} is not after earliest start {start}"),
                    }
                    .into());
                }
            }
            for dep in &depends_on {
                load_task(&store, dep)?;
            }

            let mut task = Task::new(&title, duration, priority)
                .with_window(earliest, latest)
                .with_scheduled_date(date.unwrap_or(today))
                .flexible(flexible);
            if let Some(description) = description {
                task = task.with_description(description);
            }
            for dep in depends_on {
                task = task.with_dependency(dep);
            }

            store.create_task(&task)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("Task '{title}' added: {}", task.id);
            }
        }
        TaskAction::List {
            all,
            overdue,
            completed,
            date,
            verbose,
            json,
        } => {
            let cutoff = date.unwrap_or(today);
            let mut tasks = store.load_tasks()?;
            tasks.sort_by_key(|t| (!t.is_completed, t.scheduled_date.unwrap_or(NaiveDate::MAX), t.is_active()));

            if !all {
                tasks.retain(|t| {
                    if overdue {
                        t.is_overdue(today)
                    } else if completed {
                        t.is_completed
                    } else {
                        !t.is_completed && t.is_due_on(cutoff)
                    }
                });
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
                return Ok(());
            }
            if tasks.is_empty() {
                println!("No tasks to display.");
                return Ok(());
            }
            for task in &tasks {
                let (glyph, suffix) = status(task, today);
                println!("[{glyph}] {}{suffix}", task.title);
                if verbose {
                    print_details(task);
                }
            }
        }
        TaskAction::Start { id, at } => {
            let tasks = store.load_tasks()?;
            if let Some(active) = active_task(&tasks) {
                return Err(format!(
                    "already working on '{}'; stop it before starting another task",
                    active.title
                )
                .into());
            }

            let mut task = match id {
                Some(id) => tasks
                    .into_iter()
                    .find(|t| t.id == id)
                    .ok_or_else(|| not_found(&id))?,
                None => tasks
                    .into_iter()
                    .find(|t| !t.is_completed && t.is_due_on(today))
                    .ok_or("no open tasks to start")?,
            };

            let start = at.unwrap_or(now);
            task.start_session(start)?;
            store.update_task(&task)?;
            println!("Started '{}' at {}.", task.title, start.format("%H:%M"));
        }
        TaskAction::Stop { at, complete } => {
            let tasks = store.load_tasks()?;
            let mut task = active_task(&tasks).cloned().ok_or("no active task to stop")?;

            let session = task.stop_session(at.unwrap_or(now))?;
            if complete {
                task.complete();
            }
            store.update_task(&task)?;

            println!("Session duration: {} minutes.", session.duration().num_minutes());
            if complete {
                println!("Task '{}' marked as completed.", task.title);
            }
        }
        TaskAction::Complete { id } => {
            let mut task = load_task(&store, &id)?;
            if task.is_active() {
                let session = task.stop_session(now.max(task.active_session_start.unwrap_or(now)))?;
                tracing::debug!(task = %task.id, minutes = session.duration().num_minutes(), "closed active session");
            }
            task.complete();
            store.update_task(&task)?;
            println!("Task '{}' marked as completed.", task.title);
        }
        TaskAction::Delete { id } => {
            let task = load_task(&store, &id)?;
            let tasks = store.load_tasks()?;
            let dependents: Vec<&str> = tasks
                .iter()
                .filter(|t| t.depends_on.contains(&id))
                .map(|t| t.title.as_str())
                .collect();
            if !dependents.is_empty() {
                tracing::warn!(task = %id, ?dependents, "deleted task is still listed as a dependency");
            }
            store.delete_task(&id)?;
            println!("Task '{}' deleted.", task.title);
        }
    }
    Ok(())
}
