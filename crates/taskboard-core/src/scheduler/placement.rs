//! Candidate selection and slot search for the placement loop.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::dependency::DependencyGate;
use super::free_intervals::{FreeIntervals, Interval};
use crate::task::Task;
use crate::timeline::ScheduledBlock;

/// Deadline component of the placement order.
///
/// Variant order is significant: any concrete time sorts before `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Deadline {
    At(NaiveTime),
    Unbounded,
}

impl From<Option<NaiveTime>> for Deadline {
    fn from(time: Option<NaiveTime>) -> Self {
        time.map_or(Deadline::Unbounded, Deadline::At)
    }
}

/// Total order over candidates; the smallest key is placed first.
///
/// Fields compare in declaration order: inflexible before flexible, then
/// priority 1 before 3, then the tightest `latest_end_time`, then the longest
/// duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlacementKey {
    pub flexible: bool,
    pub priority: u8,
    pub deadline: Deadline,
    pub duration: Reverse<u32>,
}

impl PlacementKey {
    pub fn of(task: &Task) -> Self {
        Self {
            flexible: task.flexible,
            priority: task.priority,
            deadline: task.latest_end_time.into(),
            duration: Reverse(task.duration_minutes),
        }
    }
}

/// Index in `pending` of the best eligible task, or `None` if every pending
/// task is blocked. Ties go to the earliest task in `pending`.
pub fn select_candidate(
    pending: &[&Task],
    gate: &DependencyGate<'_>,
    placed: &HashMap<&str, NaiveDateTime>,
) -> Option<usize> {
    pending
        .iter()
        .enumerate()
        .filter(|(_, task)| gate.is_eligible(task, placed))
        .min_by_key(|(_, task)| PlacementKey::of(task))
        .map(|(index, _)| index)
}

/// Bounds a task's block must fit inside on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementWindow {
    pub earliest_start: NaiveDateTime,
    pub latest_end: NaiveDateTime,
}

impl PlacementWindow {
    /// Combine the task's time-of-day bounds with `today`, defaulting to the
    /// day window, and push the start past any placed dependency.
    pub fn for_task(
        task: &Task,
        today: NaiveDate,
        day_start: NaiveDateTime,
        day_end: NaiveDateTime,
        dependency_end: Option<NaiveDateTime>,
    ) -> Self {
        let mut earliest_start = task
            .earliest_start_time
            .map_or(day_start, |t| today.and_time(t));
        if let Some(dep_end) = dependency_end {
            earliest_start = earliest_start.max(dep_end);
        }
        let latest_end = task.latest_end_time.map_or(day_end, |t| today.and_time(t));

        Self {
            earliest_start,
            latest_end,
        }
    }
}

/// First slot of `duration` inside `window` that fits a free interval.
///
/// With a positive buffer, a slot whose end would land within `buffer` of an
/// already-scheduled block's start is skipped.
pub fn find_slot(
    free: &FreeIntervals,
    window: PlacementWindow,
    duration: Duration,
    buffer: Duration,
    scheduled: &[ScheduledBlock],
) -> Option<Interval> {
    for interval in free.iter() {
        let clamped = interval.clamp(window.earliest_start, window.latest_end);
        if clamped.is_empty() || clamped.duration() < duration {
            continue;
        }

        let start = clamped.start;
        let end = start + duration;

        if buffer > Duration::zero() && crowds_next_block(end, buffer, scheduled) {
            tracing::debug!(%start, %end, "slot skipped: buffer would run into a scheduled block");
            continue;
        }

        return Some(Interval::new(start, end));
    }
    None
}

fn crowds_next_block(end: NaiveDateTime, buffer: Duration, scheduled: &[ScheduledBlock]) -> bool {
    scheduled
        .iter()
        .any(|block| block.start_time < end + buffer && block.end_time > end)
}
