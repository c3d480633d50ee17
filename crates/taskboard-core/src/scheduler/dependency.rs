//! Dependency gating for the placement loop.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::task::Task;

/// Resolves `depends_on` ids against the full task pool.
///
/// The pool includes tasks that are not candidates for today (completed,
/// in progress, or dated in the future) so that dependencies on them are
/// judged by their real state.
pub struct DependencyGate<'a> {
    known: HashMap<&'a str, &'a Task>,
}

impl<'a> DependencyGate<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        let known = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
        Self { known }
    }

    /// Whether every dependency of `task` is satisfied.
    ///
    /// A dependency is satisfied when it is completed or already placed this
    /// run. Ids that match no known task count as satisfied.
    pub fn is_eligible(&self, task: &Task, placed: &HashMap<&str, NaiveDateTime>) -> bool {
        task.depends_on.iter().all(|dep_id| match self.known.get(dep_id.as_str()) {
            None => {
                tracing::debug!(task = %task.id, dependency = %dep_id, "ignoring unknown dependency");
                true
            }
            Some(dep) => dep.is_completed || placed.contains_key(dep_id.as_str()),
        })
    }

    /// Latest end among already-placed dependencies of `task`.
    pub fn latest_dependency_end(
        &self,
        task: &Task,
        placed: &HashMap<&str, NaiveDateTime>,
    ) -> Option<NaiveDateTime> {
        task.depends_on
            .iter()
            .filter_map(|dep_id| placed.get(dep_id.as_str()).copied())
            .max()
    }
}
