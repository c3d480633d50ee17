//! Work session tracking.
//!
//! At most one task is in progress at a time. Starting a session sets
//! `active_session_start`; stopping it appends a [`WorkSession`] and clears
//! the marker. The scheduler only reads this state.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Task;

/// A completed stretch of work on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSession {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WorkSession {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Invalid work session operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("task '{0}' already has a session in progress")]
    AlreadyActive(String),

    #[error("task '{0}' has no session in progress")]
    NotActive(String),

    #[error("task '{0}' is already completed")]
    AlreadyCompleted(String),

    #[error("stop time {stop} is before session start {start}")]
    StopBeforeStart {
        start: NaiveDateTime,
        stop: NaiveDateTime,
    },
}

impl Task {
    /// Begin a work session at `at`.
    ///
    /// # Errors
    /// Returns an error if the task is completed or already in progress.
    pub fn start_session(&mut self, at: NaiveDateTime) -> Result<(), SessionError> {
        if self.is_completed {
            return Err(SessionError::AlreadyCompleted(self.title.clone()));
        }
        if self.is_active() {
            return Err(SessionError::AlreadyActive(self.title.clone()));
        }
        self.active_session_start = Some(at);
        Ok(())
    }

    /// End the session in progress at `at` and record it.
    ///
    /// # Errors
    /// Returns an error if no session is in progress or `at` precedes its start.
    pub fn stop_session(&mut self, at: NaiveDateTime) -> Result<WorkSession, SessionError> {
        let start = self
            .active_session_start
            .ok_or_else(|| SessionError::NotActive(self.title.clone()))?;
        if at < start {
            return Err(SessionError::StopBeforeStart { start, stop: at });
        }

        let session = WorkSession { start, end: at };
        self.work_sessions.push(session);
        self.active_session_start = None;
        Ok(session)
    }
}

/// The first task with a session in progress, if any.
pub fn active_task(tasks: &[Task]) -> Option<&Task> {
    tasks.iter().find(|t| t.is_active())
}
