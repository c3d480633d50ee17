//! Integration tests for the day scheduler.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use taskboard_core::timeline::{self, IN_PROGRESS_MARKER};
use taskboard_core::{
    generate_schedule, BlockKind, DayScheduler, Event, SchedulerConfig, Task,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn at(hour: u32, min: u32) -> NaiveDateTime {
    today().and_hms_opt(hour, min, 0).unwrap()
}

fn time(hour: u32, min: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, min, 0)
}

fn task(id: &str, duration: u32) -> Task {
    Task::new(format!("Task {id}"), duration, 2).with_id(id)
}

#[test]
fn test_single_unconstrained_task_fills_start_of_day() {
    let tasks = vec![task("write", 60)];
    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(8, 0));

    assert_eq!(outcome.scheduled.len(), 1);
    assert!(outcome.unscheduled.is_empty());
    let block = &outcome.scheduled[0];
    assert_eq!(block.start_time, at(9, 0));
    assert_eq!(block.end_time, at(10, 0));
    assert_eq!(block.kind, BlockKind::Task);
    assert_eq!(block.title, "Task write");
}

#[test]
fn test_long_task_routes_around_buffered_event() {
    let event = Event::new("Standup", at(14, 0), at(15, 0)).unwrap();
    let tasks = vec![task("deep", 165)];
    let outcome = generate_schedule(&tasks, &[event], at(12, 0), at(18, 0), 15, at(11, 0));

    assert_eq!(outcome.scheduled.len(), 1);
    let block = &outcome.scheduled[0];
    assert!(
        block.end_time <= at(13, 45) || block.start_time >= at(15, 15),
        "block {}-{} runs into the buffered event",
        block.start_time,
        block.end_time
    );
    assert_eq!(block.start_time, at(15, 15));
    assert_eq!(block.end_time, at(18, 0));
}

#[test]
fn test_time_window_is_honored() {
    let tasks = vec![task("review", 60).with_window(time(13, 0), time(15, 0))];
    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(8, 0));

    let block = outcome.block_for("review").unwrap();
    assert!(block.start_time >= at(13, 0));
    assert!(block.end_time <= at(15, 0));
}

#[test]
fn test_task_longer_than_day_is_unscheduled() {
    let tasks = vec![task("marathon", 9 * 60)];
    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(8, 0));

    assert!(outcome.scheduled.is_empty());
    assert!(outcome.is_unscheduled("marathon"));
}

#[test]
fn test_overflow_leaves_last_task_unscheduled() {
    let tasks = vec![task("a", 180), task("b", 180), task("c", 180)];
    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(8, 0));

    assert_eq!(outcome.block_for("a").unwrap().start_time, at(9, 0));
    assert_eq!(outcome.block_for("b").unwrap().start_time, at(12, 0));
    assert_eq!(outcome.unscheduled.len(), 1);
    assert_eq!(outcome.unscheduled[0].id, "c");
    assert_eq!(outcome.total_minutes(), 360);
}

#[test]
fn test_short_task_fills_gap_left_by_overflow() {
    let tasks = vec![task("big", 420), task("huge", 120), task("small", 45)];
    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(8, 0));

    assert_eq!(outcome.block_for("big").unwrap().end_time, at(16, 0));
    assert!(outcome.is_unscheduled("huge"));
    assert_eq!(outcome.block_for("small").unwrap().start_time, at(16, 0));
}

#[test]
fn test_inflexible_tasks_are_placed_before_flexible_ones() {
    let tasks = vec![
        Task::new("Flexible urgent", 60, 1).with_id("flex").flexible(true),
        Task::new("Fixed chore", 60, 3).with_id("fixed"),
    ];
    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(8, 0));

    assert_eq!(outcome.scheduled[0].id, "fixed");
    assert_eq!(outcome.scheduled[1].id, "flex");
}

#[test]
fn test_completed_tasks_never_appear() {
    let mut done = task("done", 30);
    done.complete();
    let tasks = vec![done, task("open", 30)];
    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(8, 0));

    assert!(outcome.block_for("done").is_none());
    assert!(!outcome.is_unscheduled("done"));
    assert_eq!(outcome.block_for("open").unwrap().start_time, at(9, 0));
}

#[test]
fn test_overdue_tasks_are_scheduled_today() {
    let yesterday = today() - Duration::days(1);
    let tasks = vec![task("late", 30).with_scheduled_date(yesterday)];
    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(8, 0));

    assert_eq!(outcome.scheduled.len(), 1);
}

#[test]
fn test_in_progress_block_is_rounded_to_buffer() {
    let mut active = task("active", 30);
    active.active_session_start = Some(at(9, 7));
    let tasks = vec![active, task("next", 30)];

    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 15, at(9, 20));

    let reserved = outcome.block_for("active").unwrap();
    assert_eq!(reserved.kind, BlockKind::InProgress);
    assert_eq!(reserved.title, format!("Task active{IN_PROGRESS_MARKER}"));
    assert_eq!(reserved.start_time, at(9, 7));
    assert_eq!(reserved.end_time, at(9, 45));
    assert_eq!(outcome.block_for("next").unwrap().start_time, at(10, 0));
}

#[test]
fn test_overrunning_session_is_extended_to_now() {
    let mut active = task("active", 30);
    active.active_session_start = Some(at(9, 0));
    let tasks = vec![active, task("next", 30)];

    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(11, 10));

    assert_eq!(outcome.block_for("active").unwrap().end_time, at(11, 10));
    assert_eq!(outcome.block_for("next").unwrap().start_time, at(11, 10));
}

#[test]
fn test_in_progress_block_is_never_unscheduled() {
    let mut active = task("active", 600);
    active.active_session_start = Some(at(9, 0));
    let tasks = vec![active];

    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(9, 30));

    assert!(outcome.unscheduled.is_empty());
    assert_eq!(outcome.block_for("active").unwrap().end_time, at(19, 0));
}

#[test]
fn test_scheduler_config_buffer_matches_free_function() {
    let tasks = vec![task("a", 45), task("b", 45), task("c", 45)];
    let scheduler = DayScheduler::with_config(SchedulerConfig { buffer_minutes: 5 });

    let from_struct = scheduler.generate_schedule(&tasks, &[], at(9, 0), at(17, 0), at(8, 0));
    let from_fn = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 5, at(8, 0));

    assert_eq!(from_struct.scheduled, from_fn.scheduled);
    assert_eq!(from_struct.scheduled[1].start_time, at(9, 50));
    assert_eq!(from_struct.scheduled[2].start_time, at(10, 40));
}

#[test]
fn test_scheduled_blocks_are_ordered_by_start() {
    let tasks = vec![
        task("late", 30).with_window(time(15, 0), None),
        task("early", 30),
        Task::new("Urgent afternoon", 30, 1)
            .with_id("urgent")
            .with_window(time(13, 0), None),
    ];
    let outcome = generate_schedule(&tasks, &[], at(9, 0), at(17, 0), 0, at(8, 0));

    let starts: Vec<_> = outcome.scheduled.iter().map(|b| b.start_time).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
    assert_eq!(outcome.scheduled[0].id, "early");
}

#[test]
fn test_merged_timeline_interleaves_events() {
    let event = Event::new("Lunch", at(12, 0), at(13, 0)).unwrap().with_id("lunch");
    let events = vec![event];
    let tasks = vec![task("a", 180), task("b", 60)];
    let outcome = generate_schedule(&tasks, &events, at(9, 0), at(17, 0), 0, at(8, 0));

    let event_blocks = timeline::event_blocks(&events, today(), at(8, 0));
    let merged = timeline::merge(&outcome.scheduled, &event_blocks);

    let ids: Vec<&str> = merged.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, ["a", "lunch", "b"]);
    assert_eq!(merged[1].title, "[EVENT] Lunch");
    assert_eq!(merged[1].kind, BlockKind::Event);
    assert_eq!(timeline::total_minutes(&merged), 300);
}

#[test]
fn test_empty_day_window_places_nothing() {
    let tasks = vec![task("a", 30)];
    let outcome = generate_schedule(&tasks, &[], at(17, 0), at(17, 0), 0, at(8, 0));

    assert!(outcome.scheduled.is_empty());
    assert!(outcome.is_unscheduled("a"));
}
