//! Day scheduler.
//!
//! Packs a pool of tasks into a single day around fixed calendar events:
//! - Reserves time for the task currently in progress
//! - Carves events (with buffer on both sides) out of the day's free time
//! - Repeatedly picks the best task whose dependencies are satisfied and
//!   places it in the first free slot honoring its time window
//!
//! Placement is greedy and never backtracks. Tasks that cannot be placed are
//! returned as unscheduled rather than split or shortened.

pub mod active_session;
pub mod dependency;
pub mod free_intervals;
pub mod placement;

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};

use crate::event::Event;
use crate::task::Task;
use crate::timeline::{self, BlockKind, ScheduledBlock};

pub use active_session::ActiveSession;
pub use dependency::DependencyGate;
pub use free_intervals::{FreeIntervals, Interval, Padding};
pub use placement::{Deadline, PlacementKey, PlacementWindow};

/// Scheduler configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Minimum gap after each task block and around each event (minutes)
    pub buffer_minutes: u32,
}

impl SchedulerConfig {
    pub fn buffer(&self) -> Duration {
        Duration::minutes(i64::from(self.buffer_minutes))
    }
}

/// Result of one scheduling run.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOutcome<'a> {
    /// Placed blocks ordered by start time, including the in-progress block
    pub scheduled: Vec<ScheduledBlock>,
    /// Input tasks that could not be placed, in resolution order
    pub unscheduled: Vec<&'a Task>,
}

impl ScheduleOutcome<'_> {
    /// Total scheduled time in minutes.
    pub fn total_minutes(&self) -> i64 {
        timeline::total_minutes(&self.scheduled)
    }

    /// The block placed for `id`, if any.
    pub fn block_for(&self, id: &str) -> Option<&ScheduledBlock> {
        self.scheduled.iter().find(|b| b.id == id)
    }

    pub fn is_unscheduled(&self, id: &str) -> bool {
        self.unscheduled.iter().any(|t| t.id == id)
    }
}

/// Greedy day scheduler
#[derive(Debug, Clone, Default)]
pub struct DayScheduler {
    config: SchedulerConfig,
}

impl DayScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Generate the schedule for the day containing `day_start`.
    ///
    /// # Arguments
    /// * `tasks` - Full task pool; completed and future-dated tasks are
    ///   skipped but still satisfy or block dependencies
    /// * `events` - Calendar events; only those starting on `day_start`'s
    ///   date consume time
    /// * `day_start` / `day_end` - Scheduling window
    /// * `now` - Current time, used for the in-progress estimate
    ///
    /// # Returns
    /// Placed blocks ordered by start time, and the tasks left unplaced.
    pub fn generate_schedule<'a>(
        &self,
        tasks: &'a [Task],
        events: &[Event],
        day_start: NaiveDateTime,
        day_end: NaiveDateTime,
        now: NaiveDateTime,
    ) -> ScheduleOutcome<'a> {
        let today = day_start.date();
        let buffer = self.config.buffer();

        let mut scheduled: Vec<ScheduledBlock> = Vec::new();
        let mut unscheduled: Vec<&'a Task> = Vec::new();
        let mut placed: HashMap<&'a str, NaiveDateTime> = HashMap::new();

        // 1. Reserve the in-progress task and push the day start past it
        let mut effective_start = day_start;
        let mut active_id: Option<&'a str> = None;
        if let Some(active) = ActiveSession::detect(tasks, now, buffer) {
            effective_start = effective_start.max(active.resume_at);
            active_id = Some(active.task.id.as_str());
            placed.insert(active.task.id.as_str(), active.block.end_time);
            scheduled.push(active.block);
        }

        // 2. Carve today's events out of the free time
        let mut free = FreeIntervals::new(effective_start, day_end);
        let mut todays_events: Vec<&Event> = events.iter().filter(|e| e.occurs_on(today)).collect();
        todays_events.sort_by_key(|e| e.start);
        for event in todays_events {
            free.subtract(Interval::new(event.start, event.end), Padding::symmetric(buffer));
        }

        // 3. Candidate pool
        let gate = DependencyGate::new(tasks);
        let mut pending: Vec<&'a Task> = tasks
            .iter()
            .filter(|t| Some(t.id.as_str()) != active_id)
            .filter(|t| !t.is_completed && t.is_due_on(today))
            .collect();

        tracing::debug!(
            %today,
            start = %effective_start,
            end = %day_end,
            candidates = pending.len(),
            free_minutes = free.total().num_minutes(),
            "scheduling day"
        );

        // 4. Place one task per iteration until the pool drains or stalls
        while !pending.is_empty() {
            let Some(index) = placement::select_candidate(&pending, &gate, &placed) else {
                tracing::debug!(
                    blocked = pending.len(),
                    "no task has its dependencies satisfied; leaving the rest unscheduled"
                );
                unscheduled.append(&mut pending);
                break;
            };
            let task = pending.remove(index);

            let window = PlacementWindow::for_task(
                task,
                today,
                effective_start,
                day_end,
                gate.latest_dependency_end(task, &placed),
            );

            match placement::find_slot(&free, window, task.duration(), buffer, &scheduled) {
                Some(slot) => {
                    tracing::debug!(task = %task.id, start = %slot.start, end = %slot.end, "placed task");
                    free.subtract(slot, Padding::trailing(buffer));
                    placed.insert(task.id.as_str(), slot.end);
                    scheduled.push(ScheduledBlock::new(
                        task.id.clone(),
                        task.title.clone(),
                        slot.start,
                        slot.end,
                        BlockKind::Task,
                    ));
                }
                None => {
                    tracing::debug!(task = %task.id, "no free slot fits; task unscheduled");
                    unscheduled.push(task);
                }
            }
        }

        scheduled.sort_by_key(|b| b.start_time);

        ScheduleOutcome {
            scheduled,
            unscheduled,
        }
    }
}

/// Convenience function to schedule a day with the given buffer
pub fn generate_schedule<'a>(
    tasks: &'a [Task],
    events: &[Event],
    day_start: NaiveDateTime,
    day_end: NaiveDateTime,
    buffer_minutes: u32,
    now: NaiveDateTime,
) -> ScheduleOutcome<'a> {
    DayScheduler::with_config(SchedulerConfig { buffer_minutes })
        .generate_schedule(tasks, events, day_start, day_end, now)
}
