//! Calendar event commands for CLI.

use chrono::{NaiveDate, NaiveDateTime};
use clap::Subcommand;
use taskboard_core::{Event, TaskStore, ValidationError};

use crate::parse;

#[derive(Subcommand)]
pub enum EventAction {
    /// Add a calendar event
    Add {
        /// Event title
        title: String,
        /// Start (YYYY-MM-DD HH:MM)
        #[arg(long, value_parser = parse::datetime)]
        start: NaiveDateTime,
        /// End (YYYY-MM-DD HH:MM)
        #[arg(long, value_parser = parse::datetime)]
        end: NaiveDateTime,
        /// Event description
        #[arg(long)]
        description: Option<String>,
    },
    /// List events
    List {
        /// Show events on this date (default: today)
        #[arg(long, value_parser = parse::date)]
        date: Option<NaiveDate>,
        /// Show all events regardless of date
        #[arg(long)]
        all: bool,
        /// Show event descriptions
        #[arg(long)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
}

fn describe(event: &Event, now: NaiveDateTime) -> String {
    let label = if event.is_ongoing(now) {
        "Event - Ongoing"
    } else {
        "Event"
    };
    format!(
        "- {} ({label}): {} to {}",
        event.title,
        event.start.format("%Y-%m-%d %H:%M"),
        event.end.format("%Y-%m-%d %H:%M")
    )
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = TaskStore::open()?;
    let now = parse::now();

    match action {
        EventAction::Add {
            title,
            start,
            end,
            description,
        } => {
            let mut event = Event::new(&title, start, end)?;
            if let Some(description) = description {
                event = event.with_description(description);
            }
            store.create_event(&event)?;
            println!("Event '{title}' added: {}", event.id);
        }
        EventAction::List {
            date,
            all,
            verbose,
            json,
        } => {
            let day = date.unwrap_or(now.date());
            let mut events = store.load_events()?;
            if !all {
                events.retain(|e| e.occurs_on(day));
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
                return Ok(());
            }
            if events.is_empty() {
                println!("No events found.");
                return Ok(());
            }
            for event in &events {
                println!("{}", describe(event, now));
                if verbose {
                    println!("  ID: {}", event.id);
                    println!("  Description: {}", event.description.as_deref().unwrap_or("-"));
                }
            }
        }
        EventAction::Delete { id } => {
            if !store.delete_event(&id)? {
                return Err(ValidationError::NotFound { kind: "Event", id }.into());
            }
            println!("Event deleted.");
        }
    }
    Ok(())
}
