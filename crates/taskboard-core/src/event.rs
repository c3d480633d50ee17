//! Calendar events.
//!
//! Events are immovable: the scheduler routes tasks around them but never
//! places or drops them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

fn default_source() -> String {
    "manual".into()
}

/// A fixed calendar entry that consumes time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub description: Option<String>,
    /// Origin tag: "manual", "google", "outlook", ...
    #[serde(default = "default_source")]
    pub source: String,
    /// Id in the external calendar, if imported
    #[serde(default)]
    pub external_id: Option<String>,
}

impl Event {
    /// Create a manual event.
    ///
    /// # Errors
    /// Returns an error if `end` is not after `start`.
    pub fn new(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            start,
            end,
            description: None,
            source: default_source(),
            external_id: None,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the event starts on `date`.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.start.date() == date
    }

    /// Whether `now` falls inside the event, bounds included.
    pub fn is_ongoing(&self, now: NaiveDateTime) -> bool {
        self.start <= now && now <= self.end
    }

    pub fn has_ended(&self, now: NaiveDateTime) -> bool {
        self.end <= now
    }

    /// Check if this event overlaps with a time range
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && self.end > start
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}
