//! # Taskboard Core Library
//!
//! This library provides the core business logic for Taskboard, a personal
//! day planner. All operations are available through the standalone
//! `taskboard` CLI binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Scheduler**: Packs a pool of tasks around fixed calendar events into a
//!   conflict-free list of time blocks for a single day
//! - **Timeline**: The scheduler's output blocks and helpers for merging
//!   calendar events into a display timeline
//! - **Storage**: SQLite-based task/event storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`DayScheduler`]: Greedy, dependency-aware day scheduler
//! - [`Task`] / [`Event`]: Planner data model
//! - [`TaskStore`]: Task and event persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod event;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod timeline;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use event::Event;
pub use scheduler::{generate_schedule, DayScheduler, ScheduleOutcome, SchedulerConfig};
pub use storage::{Config, TaskStore};
pub use task::{SessionError, Task, WorkSession};
pub use timeline::{BlockKind, ScheduledBlock};
