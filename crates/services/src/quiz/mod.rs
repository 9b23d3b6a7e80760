mod run;

use std::time::Duration;

use lms_core::model::{CourseId, Document, ModuleId};
use lms_core::quiz::DEFAULT_QUIZ_DURATION;
use tracing::debug;

use crate::error::QuizError;

pub use run::{FinishReason, QuizOutcome, QuizRun};

/// Quiz timing knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    pub duration: Duration,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            duration: DEFAULT_QUIZ_DURATION,
        }
    }
}

/// Starts timed quiz runs for course modules.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuizService {
    settings: QuizSettings,
}

impl QuizService {
    #[must_use]
    pub fn new(settings: QuizSettings) -> Self {
        Self { settings }
    }

    /// Start the countdown for a module's quiz.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::UnknownCourse` / `UnknownModule` for missing ids,
    /// `QuizError::EmptyQuiz` when the module has no questions,
    /// `QuizError::NoRuntime` outside a runtime, or `QuizError::DurationTooLong`
    /// when the deadline cannot be represented.
    pub fn start(
        &self,
        doc: &Document,
        course_id: CourseId,
        module_id: ModuleId,
    ) -> Result<QuizRun, QuizError> {
        let course = doc
            .course(course_id)
            .ok_or(QuizError::UnknownCourse(course_id))?;
        let module = course.module(module_id).ok_or(QuizError::UnknownModule {
            course: course_id,
            module: module_id,
        })?;
        if module.quiz().is_empty() {
            return Err(QuizError::EmptyQuiz(module_id));
        }

        let title = format!("{} - {}", course.name(), module.name());
        let run = QuizRun::start(
            course_id,
            module_id,
            title,
            module.quiz().to_vec(),
            self.settings.duration,
        )?;
        debug!(course_id = %course_id, module_id = %module_id, secs = self.settings.duration.as_secs(), "quiz started");
        Ok(run)
    }
}
