use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::course::Course;
use crate::model::ids::{CourseId, ModuleId};

/// Per-user completion sets, keyed by course.
///
/// Serializes as `{"<course id>": [<module id>, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(BTreeMap<CourseId, BTreeSet<ModuleId>>);

impl Progress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed modules in a course.
    #[must_use]
    pub fn completed_count(&self, course_id: CourseId) -> usize {
        self.0.get(&course_id).map_or(0, BTreeSet::len)
    }

    /// Returns true if the module has been marked complete.
    #[must_use]
    pub fn is_complete(&self, course_id: CourseId, module_id: ModuleId) -> bool {
        self.0
            .get(&course_id)
            .is_some_and(|set| set.contains(&module_id))
    }

    /// Completed module ids for a course, in ascending order.
    pub fn completed(&self, course_id: CourseId) -> impl Iterator<Item = ModuleId> + '_ {
        self.0.get(&course_id).into_iter().flatten().copied()
    }

    /// Record a module as complete. Returns `false` if it already was.
    pub fn mark_complete(&mut self, course_id: CourseId, module_id: ModuleId) -> bool {
        self.0.entry(course_id).or_default().insert(module_id)
    }

    /// Percentage of the course's modules that are complete, in `0.0..=100.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self, course: &Course) -> f64 {
        let total = course.module_count();
        if total == 0 {
            return 0.0;
        }
        100.0 * self.completed_count(course.id()) as f64 / total as f64
    }

    /// Returns true when nothing has been completed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }
}
