mod config;
pub mod migrations;
pub mod task_store;

pub use config::{parse_time_of_day, Config, DisplayConfig, ScheduleConfig};
pub use task_store::TaskStore;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the Taskboard data directory, creating it if needed.
///
/// `TASKBOARD_DATA_DIR` overrides the location entirely. Otherwise the
/// directory is `~/.config/taskboard[-dev]/`, where `TASKBOARD_ENV=dev`
/// selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TASKBOARD_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("TASKBOARD_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("taskboard-dev")
            } else {
                base_dir.join("taskboard")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
