//! Today's schedule.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;
use serde::Serialize;
use taskboard_core::timeline;
use taskboard_core::{
    Config, DayScheduler, Event, ScheduledBlock, Task, TaskStore,
    ValidationError,
};

use crate::parse;

#[derive(Args)]
pub struct TodayArgs {
    /// Start of the scheduling window (HH:MM, default: now)
    #[arg(long, value_parser = parse::time_of_day)]
    start: Option<NaiveTime>,
    /// End of the scheduling window (HH:MM, default: 23:59)
    #[arg(long, value_parser = parse::time_of_day)]
    end: Option<NaiveTime>,
    /// Buffer in minutes between tasks and around events
    #[arg(long)]
    buffer: Option<u32>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct TodayReport<'a> {
    date: NaiveDate,
    start: NaiveDateTime,
    end: NaiveDateTime,
    buffer_minutes: u32,
    blocks: &'a [ScheduledBlock],
    total_minutes: i64,
    unscheduled: &'a [&'a Task],
}

fn render(report: &TodayReport<'_>, time_format: &str, show_unscheduled: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Today's Schedule ===\n");
    for block in report.blocks {
        let _ = writeln!(
            out,
            "{} - {}: {} ({} mins)",
            block.start_time.format(time_format),
            block.end_time.format(time_format),
            block.title,
            block.duration_minutes()
        );
    }
    let _ = writeln!(out, "\nTotal scheduled time: {} minutes", report.total_minutes);

    if show_unscheduled && !report.unscheduled.is_empty() {
        let _ = writeln!(out, "\n=== Unscheduled Tasks ===\n");
        for task in report.unscheduled {
            let _ = writeln!(out, "- {} ({} mins)", task.title, task.duration_minutes);
        }
    }
    out
}

pub fn run(args: TodayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let now = parse::now();
    let today = now.date();

    let (default_start, default_end) = config.day_window(today, now);
    let day_start = args.start.map_or(default_start, |t| today.and_time(t));
    let day_end = args.end.map_or(default_end, |t| today.and_time(t));
    if day_end <= day_start {
        return Err(ValidationError::InvalidTimeRange {
            start: day_start,
            end: day_end,
        }
        .into());
    }
    let mut scheduler_config = config.scheduler();
    if let Some(buffer) = args.buffer {
        scheduler_config.buffer_minutes = buffer;
    }
    let buffer_minutes = scheduler_config.buffer_minutes;

    let store = TaskStore::open()?;
    let tasks = store.load_tasks()?;
    let events: Vec<Event> = store
        .load_events()?
        .into_iter()
        .filter(|e| e.occurs_on(today) && !e.has_ended(now))
        .collect();

    let scheduler = DayScheduler::with_config(scheduler_config);
    let outcome = scheduler.generate_schedule(&tasks, &events, day_start, day_end, now);
    let blocks = timeline::merge(&outcome.scheduled, &timeline::event_blocks(&events, today, now));

    let report = TodayReport {
        date: today,
        start: day_start,
        end: day_end,
        buffer_minutes,
        blocks: &blocks,
        total_minutes: timeline::total_minutes(&blocks),
        unscheduled: &outcome.unscheduled,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            render(&report, &config.display.time_format, config.display.show_unscheduled)
        );
    }
    Ok(())
}
