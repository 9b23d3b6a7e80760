use lms_core::model::{Course, CourseId, Document, ModuleId, User};
use tracing::debug;

use crate::error::ProgressError;
use crate::workspace::Workspace;

/// One dashboard row: how far a user is through a course.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseProgress {
    pub course_id: CourseId,
    pub name: String,
    pub description: String,
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
}

/// Tracks which modules each user has completed.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgressService;

impl ProgressService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn completed_count(&self, user: &User, course_id: CourseId) -> usize {
        user.progress().completed_count(course_id)
    }

    /// `0.0` for a course without modules, otherwise the completed share as a
    /// percentage.
    #[must_use]
    pub fn progress_percent(&self, course: &Course, user: &User) -> f64 {
        user.progress().percent(course)
    }

    #[must_use]
    pub fn is_complete(&self, user: &User, course_id: CourseId, module_id: ModuleId) -> bool {
        user.progress().is_complete(course_id, module_id)
    }

    /// Progress for every course in catalog order.
    #[must_use]
    pub fn dashboard(&self, doc: &Document, user: &User) -> Vec<CourseProgress> {
        doc.courses()
            .iter()
            .map(|course| CourseProgress {
                course_id: course.id(),
                name: course.name().to_owned(),
                description: course.description().to_owned(),
                completed: self.completed_count(user, course.id()),
                total: course.module_count(),
                percent: self.progress_percent(course, user),
            })
            .collect()
    }

    /// Mark a module complete for a user.
    ///
    /// Returns `Ok(false)` without saving when the module was already complete.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownUser`, `UnknownCourse`, or
    /// `UnknownModule` for ids that do not exist, or
    /// `ProgressError::Storage` if the save fails.
    pub async fn mark_complete(
        &self,
        workspace: &mut Workspace,
        username: &str,
        course_id: CourseId,
        module_id: ModuleId,
    ) -> Result<bool, ProgressError> {
        let doc = workspace.document();
        let course = doc
            .course(course_id)
            .ok_or(ProgressError::UnknownCourse(course_id))?;
        if course.module(module_id).is_none() {
            return Err(ProgressError::UnknownModule {
                course: course_id,
                module: module_id,
            });
        }
        let user = doc
            .user(username)
            .ok_or_else(|| ProgressError::UnknownUser(username.to_owned()))?;
        if user.progress().is_complete(course_id, module_id) {
            return Ok(false);
        }

        workspace
            .commit(|doc| {
                let user = doc
                    .user_mut(username)
                    .ok_or_else(|| ProgressError::UnknownUser(username.to_owned()))?;
                Ok::<_, ProgressError>(user.progress_mut().mark_complete(course_id, module_id))
            })
            .await?;

        debug!(username, course_id = %course_id, module_id = %module_id, "module completed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATH: CourseId = CourseId::new(1);

    #[tokio::test]
    async fn percent_goes_from_zero_to_hundred() {
        let mut ws = Workspace::in_memory().await.unwrap();
        let svc = ProgressService::new();

        let percent = |ws: &Workspace| {
            let doc = ws.document();
            svc.progress_percent(doc.course(MATH).unwrap(), doc.user("student").unwrap())
        };

        assert!(percent(&ws).abs() < f64::EPSILON);
        assert!(svc.mark_complete(&mut ws, "student", MATH, ModuleId::new(1)).await.unwrap());
        assert!((percent(&ws) - 50.0).abs() < f64::EPSILON);
        assert!(svc.mark_complete(&mut ws, "student", MATH, ModuleId::new(2)).await.unwrap());
        assert!((percent(&ws) - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn mark_complete_twice_is_a_no_op() {
        let mut ws = Workspace::in_memory().await.unwrap();
        let svc = ProgressService::new();

        assert!(svc.mark_complete(&mut ws, "student", MATH, ModuleId::new(1)).await.unwrap());
        let once = ws.document().clone();
        assert!(!svc.mark_complete(&mut ws, "student", MATH, ModuleId::new(1)).await.unwrap());
        assert_eq!(*ws.document(), once);

        let student = ws.document().user("student").unwrap();
        assert_eq!(svc.completed_count(student, MATH), 1);
        assert!(svc.is_complete(student, MATH, ModuleId::new(1)));
        assert!(!svc.is_complete(student, MATH, ModuleId::new(2)));
    }

    #[tokio::test]
    async fn unknown_ids_are_rejected() {
        let mut ws = Workspace::in_memory().await.unwrap();
        let svc = ProgressService::new();

        let err = svc
            .mark_complete(&mut ws, "student", CourseId::new(9), ModuleId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::UnknownCourse(_)));

        let err = svc
            .mark_complete(&mut ws, "student", MATH, ModuleId::new(3))
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::UnknownModule { .. }));

        let err = svc
            .mark_complete(&mut ws, "ghost", MATH, ModuleId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::UnknownUser(_)));
    }

    #[tokio::test]
    async fn dashboard_lists_every_course() {
        let mut ws = Workspace::in_memory().await.unwrap();
        let svc = ProgressService::new();
        svc.mark_complete(&mut ws, "student", MATH, ModuleId::new(2))
            .await
            .unwrap();

        let doc = ws.document();
        let rows = svc.dashboard(doc, doc.user("student").unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Mathematics 101");
        assert_eq!((rows[0].completed, rows[0].total), (1, 2));
        assert!((rows[0].percent - 50.0).abs() < f64::EPSILON);
    }
}
