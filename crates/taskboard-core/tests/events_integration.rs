//! Integration tests for scheduling around calendar events.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use taskboard_core::timeline::event_blocks;
use taskboard_core::{generate_schedule, Event, Task};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

fn at(hour: u32, min: u32) -> NaiveDateTime {
    today().and_hms_opt(hour, min, 0).unwrap()
}

fn task(id: &str, duration: u32) -> Task {
    Task::new(format!("Task {id}"), duration, 2).with_id(id)
}

fn event(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Event {
    Event::new(format!("Event {id}"), start, end).unwrap().with_id(id)
}

#[test]
fn test_tasks_never_overlap_events() {
    let events = vec![event("sync", at(10, 0), at(11, 0))];
    let tasks = vec![task("a", 60), task("b", 60), task("c", 60)];
    let outcome = generate_schedule(&tasks, &events, at(9, 0), at(17, 0), 0, at(8, 0));

    assert_eq!(outcome.scheduled.len(), 3);
    for block in &outcome.scheduled {
        assert!(
            !events[0].overlaps(block.start_time, block.end_time),
            "{} overlaps the event",
            block.id
        );
    }
    assert_eq!(outcome.block_for("b").unwrap().start_time, at(11, 0));
}

#[test]
fn test_buffer_applies_before_and_after_event() {
    let events = vec![event("lunch", at(12, 0), at(13, 0))];
    let tasks = vec![task("morning", 165), task("afternoon", 60)];
    let outcome = generate_schedule(&tasks, &events, at(9, 0), at(17, 0), 15, at(8, 0));

    let morning = outcome.block_for("morning").unwrap();
    assert_eq!(morning.start_time, at(9, 0));
    assert_eq!(morning.end_time, at(11, 45));

    let afternoon = outcome.block_for("afternoon").unwrap();
    assert_eq!(afternoon.start_time, at(13, 15));
}

#[test]
fn test_task_too_long_for_buffered_gap_moves_after_event() {
    let events = vec![event("lunch", at(12, 0), at(13, 0))];
    let tasks = vec![task("long", 170)];
    let outcome = generate_schedule(&tasks, &events, at(9, 0), at(17, 0), 15, at(8, 0));

    assert_eq!(outcome.block_for("long").unwrap().start_time, at(13, 15));
}

#[test]
fn test_multiple_events_split_the_day() {
    let events = vec![
        event("second", at(13, 0), at(14, 0)),
        event("first", at(10, 0), at(11, 0)),
    ];
    let tasks = vec![task("a", 120), task("b", 120), task("c", 60)];
    let outcome = generate_schedule(&tasks, &events, at(9, 0), at(17, 0), 0, at(8, 0));

    assert_eq!(outcome.block_for("a").unwrap().start_time, at(11, 0));
    assert_eq!(outcome.block_for("b").unwrap().start_time, at(14, 0));
    assert_eq!(outcome.block_for("c").unwrap().start_time, at(9, 0));
    assert!(outcome.unscheduled.is_empty());
}

#[test]
fn test_event_overlapping_day_start_trims_free_time() {
    let events = vec![event("early", at(8, 0), at(10, 0))];
    let tasks = vec![task("a", 30)];
    let outcome = generate_schedule(&tasks, &events, at(9, 0), at(17, 0), 0, at(8, 0));

    assert_eq!(outcome.block_for("a").unwrap().start_time, at(10, 0));
}

#[test]
fn test_event_blocking_whole_day_leaves_everything_unscheduled() {
    let events = vec![event("offsite", at(8, 0), at(18, 0))];
    let tasks = vec![task("a", 30), task("b", 30)];
    let outcome = generate_schedule(&tasks, &events, at(9, 0), at(17, 0), 0, at(8, 0));

    assert!(outcome.scheduled.is_empty());
    let ids: Vec<&str> = outcome.unscheduled.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[test]
fn test_events_on_other_days_consume_no_time() {
    let yesterday = at(9, 0) - Duration::days(1);
    let events = vec![event("old", yesterday, yesterday + Duration::hours(8))];
    let tasks = vec![task("a", 60)];
    let outcome = generate_schedule(&tasks, &events, at(9, 0), at(17, 0), 0, at(8, 0));

    assert_eq!(outcome.block_for("a").unwrap().start_time, at(9, 0));
}

#[test]
fn test_event_blocks_mark_ongoing_and_drop_finished() {
    let events = vec![
        event("done", at(8, 0), at(9, 0)),
        event("now", at(9, 0), at(10, 0)),
        event("later", at(15, 0), at(16, 0)),
    ];
    let blocks = event_blocks(&events, today(), at(9, 30));

    let titles: Vec<&str> = blocks.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["[EVENT - ONGOING] Event now", "[EVENT] Event later"]);
}
