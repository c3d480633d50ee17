pub mod config;
pub mod event;
pub mod task;
pub mod today;
