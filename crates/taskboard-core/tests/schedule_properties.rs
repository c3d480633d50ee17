//! Property tests for schedule invariants.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;
use taskboard_core::{generate_schedule, BlockKind, Event, Task};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn at_minute(minute: u32) -> NaiveDateTime {
    today().and_hms_opt(0, 0, 0).unwrap() + Duration::minutes(i64::from(minute))
}

#[derive(Debug, Clone)]
struct TaskShape {
    duration: u32,
    priority: u8,
    flexible: bool,
    window: Option<(u32, u32)>,
    depends_on: Option<usize>,
}

fn task_shape() -> impl Strategy<Value = TaskShape> {
    (
        15u32..=180,
        1u8..=3,
        any::<bool>(),
        proptest::option::of((8u32 * 60..18 * 60, 30u32..=300)),
        proptest::option::of(0usize..8),
    )
        .prop_map(|(duration, priority, flexible, window, depends_on)| TaskShape {
            duration,
            priority,
            flexible,
            window: window.map(|(start, len)| (start, (start + len).min(23 * 60))),
            depends_on,
        })
}

fn build_tasks(shapes: &[TaskShape]) -> Vec<Task> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let mut task = Task::new(format!("Task {i}"), shape.duration, shape.priority)
                .with_id(format!("t{i}"))
                .flexible(shape.flexible);
            if let Some((start, end)) = shape.window {
                task = task.with_window(
                    NaiveTime::from_hms_opt(start / 60, start % 60, 0),
                    NaiveTime::from_hms_opt(end / 60, end % 60, 0),
                );
            }
            if let Some(dep) = shape.depends_on {
                if dep < shapes.len() && dep != i {
                    task = task.with_dependency(format!("t{dep}"));
                }
            }
            task
        })
        .collect()
}

fn event_strategy() -> impl Strategy<Value = (u32, u32)> {
    (7u32 * 60..19 * 60, 15u32..=120)
}

fn build_events(shapes: &[(u32, u32)]) -> Vec<Event> {
    shapes
        .iter()
        .enumerate()
        .filter_map(|(i, &(start, len))| {
            Event::new(format!("Event {i}"), at_minute(start), at_minute(start + len))
                .ok()
                .map(|e| e.with_id(format!("e{i}")))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn schedule_invariants_hold(
        task_shapes in proptest::collection::vec(task_shape(), 0..8),
        event_shapes in proptest::collection::vec(event_strategy(), 0..4),
        buffer in 0u32..=30,
        day_start in 7u32 * 60..11 * 60,
        day_len in 4u32 * 60..12 * 60,
    ) {
        let tasks = build_tasks(&task_shapes);
        let events = build_events(&event_shapes);
        let start = at_minute(day_start);
        let end = at_minute(day_start + day_len);

        let outcome = generate_schedule(&tasks, &events, start, end, buffer, at_minute(0));
        let blocks = &outcome.scheduled;

        // Ordered by start time
        for pair in blocks.windows(2) {
            prop_assert!(pair[0].start_time <= pair[1].start_time);
        }

        // Inside the day window, with the requested gap between task blocks
        let gap = Duration::minutes(i64::from(buffer));
        for block in blocks {
            prop_assert_eq!(block.kind, BlockKind::Task);
            prop_assert!(block.start_time >= start);
            prop_assert!(block.end_time <= end);
        }
        for pair in blocks.windows(2) {
            prop_assert!(!pair[0].overlaps(pair[1].start_time, pair[1].end_time));
            prop_assert!(
                pair[0].end_time + gap <= pair[1].start_time,
                "{} ends {} but {} starts {}",
                pair[0].id, pair[0].end_time, pair[1].id, pair[1].start_time
            );
        }

        // Never on top of an event
        for block in blocks {
            for event in &events {
                prop_assert!(!event.overlaps(block.start_time, block.end_time));
            }
        }

        // Each task inside its own window and after its dependency
        for block in blocks {
            let task = tasks.iter().find(|t| t.id == block.id).unwrap();
            prop_assert_eq!(block.end_time - block.start_time, task.duration());
            if let Some(earliest) = task.earliest_start_time {
                prop_assert!(block.start_time >= today().and_time(earliest));
            }
            if let Some(latest) = task.latest_end_time {
                prop_assert!(block.end_time <= today().and_time(latest));
            }
            for dep in &task.depends_on {
                let dep_block = outcome.block_for(dep);
                prop_assert!(dep_block.is_some(), "{} placed before its dependency {}", block.id, dep);
                if let Some(dep_block) = dep_block {
                    prop_assert!(block.start_time >= dep_block.end_time + gap);
                }
            }
        }

        // Every task resolved exactly once
        for task in &tasks {
            let placed = outcome.block_for(&task.id).is_some();
            let dropped = outcome.is_unscheduled(&task.id);
            prop_assert!(placed != dropped, "task {} placed={} dropped={}", task.id, placed, dropped);
        }
    }

    #[test]
    fn oversized_tasks_are_always_unscheduled(
        extra in 1u32..=120,
        day_len in 60u32..=600,
    ) {
        let start = at_minute(9 * 60);
        let end = at_minute(9 * 60 + day_len);
        let tasks = vec![Task::new("Too big", day_len + extra, 2).with_id("big")];

        let outcome = generate_schedule(&tasks, &[], start, end, 0, at_minute(0));

        prop_assert!(outcome.scheduled.is_empty());
        prop_assert!(outcome.is_unscheduled("big"));
    }
}
