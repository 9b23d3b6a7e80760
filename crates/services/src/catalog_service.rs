use lms_core::Clock;
use lms_core::model::{Course, CourseId, Document, Module, ModuleId};
use tracing::info;

use crate::error::CatalogError;
use crate::workspace::Workspace;

/// Course catalog reads and course creation.
#[derive(Clone, Copy, Debug)]
pub struct CatalogService {
    clock: Clock,
}

impl CatalogService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    #[must_use]
    pub fn list_courses<'a>(&self, doc: &'a Document) -> &'a [Course] {
        doc.courses()
    }

    #[must_use]
    pub fn course<'a>(&self, doc: &'a Document, id: CourseId) -> Option<&'a Course> {
        doc.course(id)
    }

    #[must_use]
    pub fn module<'a>(
        &self,
        doc: &'a Document,
        course_id: CourseId,
        module_id: ModuleId,
    ) -> Option<&'a Module> {
        doc.module(course_id, module_id)
    }

    /// Like [`Self::course`], but a missing id is an error.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownCourse`.
    pub fn require_course<'a>(
        &self,
        doc: &'a Document,
        id: CourseId,
    ) -> Result<&'a Course, CatalogError> {
        doc.course(id).ok_or(CatalogError::UnknownCourse(id))
    }

    /// # Errors
    ///
    /// Returns `CatalogError::UnknownCourse` or `CatalogError::UnknownModule`.
    pub fn require_module<'a>(
        &self,
        doc: &'a Document,
        course_id: CourseId,
        module_id: ModuleId,
    ) -> Result<&'a Module, CatalogError> {
        self.require_course(doc, course_id)?
            .module(module_id)
            .ok_or(CatalogError::UnknownModule {
                course: course_id,
                module: module_id,
            })
    }

    /// Course names in catalog order, for tagging notes.
    pub fn course_names<'a>(&self, doc: &'a Document) -> impl Iterator<Item = &'a str> + 'a {
        doc.courses().iter().map(Course::name)
    }

    /// Add a course with no modules under a fresh timestamp-derived id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Course` if the trimmed name is empty (nothing is
    /// saved), or `CatalogError::Storage` if the save fails.
    pub async fn add_course(
        &self,
        workspace: &mut Workspace,
        name: &str,
        description: &str,
    ) -> Result<CourseId, CatalogError> {
        let id = CourseId::new(self.clock.next_id_after(workspace.document().last_course_id()));
        let course = Course::new(id, name, description)?;
        let name = course.name().to_owned();

        workspace
            .commit(|doc| {
                doc.push_course(course);
                Ok::<_, CatalogError>(())
            })
            .await?;

        info!(course_id = %id, name = %name, "course added");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_core::model::CourseError;
    use lms_core::time::fixed_clock;

    #[tokio::test]
    async fn add_course_appends_with_unique_ids() {
        let mut ws = Workspace::in_memory().await.unwrap();
        let svc = CatalogService::new(fixed_clock());

        let first = svc
            .add_course(&mut ws, " Physics ", " Waves and optics ")
            .await
            .unwrap();
        let second = svc.add_course(&mut ws, "Chemistry", "").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.value(), 1_700_000_000_000);
        assert_eq!(second.value(), 1_700_000_000_001);

        let physics = svc.course(ws.document(), first).unwrap();
        assert_eq!(physics.name(), "Physics");
        assert_eq!(physics.description(), "Waves and optics");
        assert!(physics.modules().is_empty());

        let names: Vec<&str> = svc.course_names(ws.document()).collect();
        assert_eq!(names, vec!["Mathematics 101", "Physics", "Chemistry"]);
        assert_eq!(ws.store().load().await.unwrap(), *ws.document());
    }

    #[tokio::test]
    async fn blank_name_adds_nothing() {
        let mut ws = Workspace::in_memory().await.unwrap();
        let err = CatalogService::new(fixed_clock())
            .add_course(&mut ws, "   ", "desc")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Course(CourseError::EmptyName)));
        assert_eq!(ws.document().courses().len(), 1);
    }

    #[tokio::test]
    async fn module_lookup_goes_through_course() {
        let ws = Workspace::in_memory().await.unwrap();
        let svc = CatalogService::new(fixed_clock());
        let m = svc
            .module(ws.document(), CourseId::new(1), ModuleId::new(2))
            .unwrap();
        assert_eq!(m.name(), "Geometry Basics");
        assert!(
            svc.module(ws.document(), CourseId::new(9), ModuleId::new(1))
                .is_none()
        );
    }

    #[tokio::test]
    async fn required_lookups_name_what_is_missing() {
        let ws = Workspace::in_memory().await.unwrap();
        let svc = CatalogService::new(fixed_clock());
        let doc = ws.document();

        assert_eq!(
            svc.require_course(doc, CourseId::new(1)).unwrap().name(),
            "Mathematics 101"
        );
        assert!(matches!(
            svc.require_course(doc, CourseId::new(7)),
            Err(CatalogError::UnknownCourse(id)) if id == CourseId::new(7)
        ));
        assert!(matches!(
            svc.require_module(doc, CourseId::new(7), ModuleId::new(1)),
            Err(CatalogError::UnknownCourse(_))
        ));
        let err = svc
            .require_module(doc, CourseId::new(1), ModuleId::new(5))
            .unwrap_err();
        assert_eq!(err.to_string(), "course 1 has no module 5");
    }
}
