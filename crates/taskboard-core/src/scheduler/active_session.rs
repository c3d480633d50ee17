//! Reservation for the task currently in progress.
//!
//! The in-progress task gets a block from its session start to its estimated
//! end, and the rest of the day's scheduling is pushed past that point.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::task::Task;
use crate::timeline::{BlockKind, ScheduledBlock, IN_PROGRESS_MARKER};

/// The reserved block for an in-progress task.
#[derive(Debug, Clone)]
pub struct ActiveSession<'a> {
    pub task: &'a Task,
    pub block: ScheduledBlock,
    /// Earliest time anything else may be scheduled.
    pub resume_at: NaiveDateTime,
}

impl<'a> ActiveSession<'a> {
    /// Reserve time for the first task with a session in progress.
    ///
    /// The estimated end is `session start + duration`, moved forward to `now`
    /// if that is already past. With a non-zero buffer the end is rounded up
    /// to the next buffer multiple and scheduling resumes one buffer later.
    pub fn detect(tasks: &'a [Task], now: NaiveDateTime, buffer: Duration) -> Option<Self> {
        let mut active = tasks.iter().filter(|t| t.is_active());
        let task = active.next()?;
        let started = task.active_session_start?;

        let extra: Vec<&str> = active.map(|t| t.id.as_str()).collect();
        if !extra.is_empty() {
            tracing::warn!(
                active = %task.id,
                ignored = ?extra,
                "multiple tasks have a session in progress; only the first is reserved"
            );
        }

        let mut estimated_end = (started + task.duration()).max(now);
        let resume_at = if buffer > Duration::zero() {
            estimated_end = round_up(estimated_end, buffer);
            estimated_end + buffer
        } else {
            estimated_end
        };

        tracing::debug!(
            task = %task.id,
            start = %started,
            estimated_end = %estimated_end,
            resume_at = %resume_at,
            "reserved in-progress task"
        );

        let block = ScheduledBlock::new(
            task.id.clone(),
            format!("{}{}", task.title, IN_PROGRESS_MARKER),
            started,
            estimated_end,
            BlockKind::InProgress,
        );

        Some(Self {
            task,
            block,
            resume_at,
        })
    }
}

fn rounding_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Round `time` up to the next multiple of `step` counted from 0001-01-01.
fn round_up(time: NaiveDateTime, step: Duration) -> NaiveDateTime {
    let (Some(step_us), Some(since_us)) = (
        step.num_microseconds(),
        (time - rounding_epoch()).num_microseconds(),
    ) else {
        return time;
    };
    if step_us <= 0 {
        return time;
    }
    let remainder = since_us.rem_euclid(step_us);
    if remainder == 0 {
        time
    } else {
        time + Duration::microseconds(step_us - remainder)
    }
}
