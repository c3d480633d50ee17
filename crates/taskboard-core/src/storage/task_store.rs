//! SQLite-based storage for tasks and calendar events.

use std::path::Path;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use super::migrations;
use crate::error::{DatabaseError, ValidationError};
use crate::event::Event;
use crate::task::{Task, WorkSession};

const TASK_COLUMNS: &str = "id, title, description, duration_minutes, priority,
    earliest_start_time, latest_end_time, flexible, is_completed, scheduled_date,
    depends_on, work_sessions, active_session_start";

const EVENT_COLUMNS: &str = "id, title, start_at, end_at, description, source, external_id";

// === Helper Functions ===

/// Decode a JSON text column inside a row mapper
fn json_column<T: serde::de::DeserializeOwned>(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<T, rusqlite::Error> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn to_json_column<T: serde::Serialize>(column: &str, value: &T) -> Result<String, DatabaseError> {
    serde_json::to_string(value).map_err(|e| DatabaseError::CorruptColumn {
        column: column.to_string(),
        message: e.to_string(),
    })
}

/// Build a Task from a database row
fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
    let depends_on: Vec<String> = json_column(row, 10)?;
    let work_sessions: Vec<WorkSession> = json_column(row, 11)?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        duration_minutes: row.get(3)?,
        priority: row.get(4)?,
        earliest_start_time: row.get(5)?,
        latest_end_time: row.get(6)?,
        flexible: row.get(7)?,
        is_completed: row.get(8)?,
        scheduled_date: row.get(9)?,
        depends_on,
        work_sessions,
        active_session_start: row.get(12)?,
    })
}

/// Build an Event from a database row
fn row_to_event(row: &rusqlite::Row) -> Result<Event, rusqlite::Error> {
    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        start: row.get(2)?,
        end: row.get(3)?,
        description: row.get(4)?,
        source: row.get(5)?,
        external_id: row.get(6)?,
    })
}

/// SQLite database for task and event storage.
pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Open the store at `<data_dir>/taskboard.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened or migrated.
    pub fn open() -> crate::error::Result<Self> {
        let path = data_dir()?.join("taskboard.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the store at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === Tasks ===

    /// All tasks, ordered by scheduled date (undated counts as today) and priority.
    pub fn load_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             ORDER BY COALESCE(scheduled_date, date('now', 'localtime')), priority, rowid"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Replace every stored task with `tasks` in one transaction.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tasks", [])?;
        for task in tasks {
            Self::insert_task(&tx, task)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Insert a new task.
    pub fn create_task(&self, task: &Task) -> Result<(), DatabaseError> {
        Self::insert_task(&self.conn, task)
    }

    fn insert_task(conn: &Connection, task: &Task) -> Result<(), DatabaseError> {
        let depends_on = to_json_column("depends_on", &task.depends_on)?;
        let work_sessions = to_json_column("work_sessions", &task.work_sessions)?;

        conn.execute(
            &format!(
                "INSERT INTO tasks ({TASK_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                task.id,
                task.title,
                task.description,
                task.duration_minutes,
                task.priority,
                task.earliest_start_time,
                task.latest_end_time,
                task.flexible,
                task.is_completed,
                task.scheduled_date,
                depends_on,
                work_sessions,
                task.active_session_start,
            ],
        )?;
        Ok(())
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        let task = self
            .conn
            .query_row(&sql, params![id], row_to_task)
            .optional()?;
        Ok(task)
    }

    /// Overwrite an existing task.
    ///
    /// # Errors
    /// Returns `ValidationError::NotFound` (wrapped) if no task has this id.
    pub fn update_task(&self, task: &Task) -> crate::error::Result<()> {
        let depends_on = to_json_column("depends_on", &task.depends_on)?;
        let work_sessions = to_json_column("work_sessions", &task.work_sessions)?;

        let changed = self.conn.execute(
            "UPDATE tasks SET
                title = ?2, description = ?3, duration_minutes = ?4, priority = ?5,
                earliest_start_time = ?6, latest_end_time = ?7, flexible = ?8,
                is_completed = ?9, scheduled_date = ?10, depends_on = ?11,
                work_sessions = ?12, active_session_start = ?13
             WHERE id = ?1",
            params![
                task.id,
                task.title,
                task.description,
                task.duration_minutes,
                task.priority,
                task.earliest_start_time,
                task.latest_end_time,
                task.flexible,
                task.is_completed,
                task.scheduled_date,
                depends_on,
                work_sessions,
                task.active_session_start,
            ],
        )?;
        if changed == 0 {
            return Err(ValidationError::NotFound {
                kind: "Task",
                id: task.id.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Delete a task. Returns whether a row was removed.
    pub fn delete_task(&self, id: &str) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // === Events ===

    /// All events, ordered by start time, then title.
    pub fn load_events(&self) -> Result<Vec<Event>, DatabaseError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY start_at, title");
        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt
            .query_map([], row_to_event)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Replace every stored event with `events` in one transaction.
    pub fn save_events(&self, events: &[Event]) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM events", [])?;
        for event in events {
            Self::insert_event(&tx, event)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Insert a new event.
    pub fn create_event(&self, event: &Event) -> Result<(), DatabaseError> {
        Self::insert_event(&self.conn, event)
    }

    fn insert_event(conn: &Connection, event: &Event) -> Result<(), DatabaseError> {
        conn.execute(
            &format!("INSERT INTO events ({EVENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
            params![
                event.id,
                event.title,
                event.start,
                event.end,
                event.description,
                event.source,
                event.external_id,
            ],
        )?;
        Ok(())
    }

    /// Delete an event. Returns whether a row was removed.
    pub fn delete_event(&self, id: &str) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute("DELETE FROM events WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
