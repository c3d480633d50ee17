//! Timeline blocks produced by the scheduler.
//!
//! The scheduler emits task blocks only. Calendar events are turned into
//! blocks here so the caller can merge them into one display timeline.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Title marker appended to the in-progress task's block.
pub const IN_PROGRESS_MARKER: &str = " (IN PROGRESS)";

/// What a block on the timeline represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// A task placed by the scheduler
    Task,
    /// The task currently being worked on
    InProgress,
    /// A calendar event
    Event,
}

/// A block of time on the day's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledBlock {
    /// Task or event id
    pub id: String,
    pub title: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub kind: BlockKind,
}

impl ScheduledBlock {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        kind: BlockKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_time,
            end_time,
            kind,
        }
    }

    /// Get total duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Check if this block overlaps with a time range
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_time < end && self.end_time > start
    }
}

/// Blocks for events on `today` that have not yet ended at `now`.
pub fn event_blocks(events: &[Event], today: NaiveDate, now: NaiveDateTime) -> Vec<ScheduledBlock> {
    let mut blocks: Vec<ScheduledBlock> = events
        .iter()
        .filter(|e| e.occurs_on(today) && !e.has_ended(now))
        .map(|e| {
            let title = if e.is_ongoing(now) {
                format!("[EVENT - ONGOING] {}", e.title)
            } else {
                format!("[EVENT] {}", e.title)
            };
            ScheduledBlock::new(e.id.clone(), title, e.start, e.end, BlockKind::Event)
        })
        .collect();
    blocks.sort_by_key(|b| b.start_time);
    blocks
}

/// Merge task and event blocks into one list ordered by start time.
pub fn merge(scheduled: &[ScheduledBlock], events: &[ScheduledBlock]) -> Vec<ScheduledBlock> {
    let mut all: Vec<ScheduledBlock> = scheduled.iter().chain(events).cloned().collect();
    all.sort_by_key(|b| b.start_time);
    all
}

/// Sum of block durations in minutes.
pub fn total_minutes(blocks: &[ScheduledBlock]) -> i64 {
    blocks.iter().map(ScheduledBlock::duration_minutes).sum()
}
