//! Task model for the day planner.
//!
//! A task is a unit of work with a required duration, a priority, optional
//! daily time-window bounds, and dependencies on other tasks. Work sessions
//! are recorded against a task while it is in progress; see [`session`].

pub mod session;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use session::{active_task, SessionError, WorkSession};

/// Highest priority value.
pub const PRIORITY_HIGH: u8 = 1;
/// Default priority value.
pub const PRIORITY_NORMAL: u8 = 2;
/// Lowest priority value.
pub const PRIORITY_LOW: u8 = 3;

/// A unit of work to be placed on the day's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, stable across runs
    pub id: String,
    /// Task title
    pub title: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Required work time in minutes
    pub duration_minutes: u32,
    /// Priority from 1 (highest) to 3 (lowest)
    pub priority: u8,
    /// Earliest time of day the task may start
    #[serde(default)]
    pub earliest_start_time: Option<NaiveTime>,
    /// Latest time of day the task may end
    #[serde(default)]
    pub latest_end_time: Option<NaiveTime>,
    /// Flexible tasks are placed after inflexible ones
    #[serde(default)]
    pub flexible: bool,
    /// Completed tasks are never scheduled
    #[serde(default)]
    pub is_completed: bool,
    /// First day the task is eligible for
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    /// Ids of tasks that must finish before this one starts
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Historical record of completed work, append-only
    #[serde(default)]
    pub work_sessions: Vec<WorkSession>,
    /// Start of the session currently in progress
    #[serde(default)]
    pub active_session_start: Option<NaiveDateTime>,
}

impl Task {
    /// Create a task with a fresh id and no constraints.
    pub fn new(title: impl Into<String>, duration_minutes: u32, priority: u8) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            duration_minutes,
            priority,
            earliest_start_time: None,
            latest_end_time: None,
            flexible: false,
            is_completed: false,
            scheduled_date: None,
            depends_on: Vec::new(),
            work_sessions: Vec::new(),
            active_session_start: None,
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Constrain the task to a daily window. Either bound may be open.
    pub fn with_window(mut self, earliest: Option<NaiveTime>, latest: Option<NaiveTime>) -> Self {
        self.earliest_start_time = earliest;
        self.latest_end_time = latest;
        self
    }

    pub fn with_scheduled_date(mut self, date: NaiveDate) -> Self {
        self.scheduled_date = Some(date);
        self
    }

    /// Add a dependency. Duplicate ids are ignored.
    pub fn with_dependency(mut self, task_id: impl Into<String>) -> Self {
        let task_id = task_id.into();
        if !self.depends_on.contains(&task_id) {
            self.depends_on.push(task_id);
        }
        self
    }

    pub fn flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Required work time as a duration.
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Whether a work session is currently in progress.
    pub fn is_active(&self) -> bool {
        self.active_session_start.is_some()
    }

    /// Whether the task may be scheduled on `date`.
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.scheduled_date.map_or(true, |d| d <= date)
    }

    /// Dated before `today`, still open, and not being worked on.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed
            && !self.is_active()
            && self.scheduled_date.is_some_and(|d| d < today)
    }

    /// Total time recorded across all work sessions.
    pub fn time_spent(&self) -> Duration {
        self.work_sessions
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.duration())
    }

    /// Mark the task completed.
    pub fn complete(&mut self) {
        self.is_completed = true;
    }
}
