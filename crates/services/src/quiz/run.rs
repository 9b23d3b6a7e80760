use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use lms_core::model::{CourseId, ModuleId, Question};
use lms_core::quiz::{Answers, QuizScore};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::error::QuizError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Submitted,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub course_id: CourseId,
    pub module_id: ModuleId,
    pub score: QuizScore,
    pub reason: FinishReason,
}

#[derive(Default)]
struct AnswerSheet {
    answers: Answers,
    closed: bool,
}

/// Lock the sheet, recovering it if a holder panicked.
fn lock(sheet: &Mutex<AnswerSheet>) -> MutexGuard<'_, AnswerSheet> {
    sheet.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// A quiz in progress with its countdown.
///
/// The countdown task is aborted when the run is submitted or dropped, so
/// replacing a run cancels the previous timer.
pub struct QuizRun {
    course_id: CourseId,
    module_id: ModuleId,
    title: String,
    questions: Arc<[Question]>,
    sheet: Arc<Mutex<AnswerSheet>>,
    deadline: Instant,
    countdown: JoinHandle<()>,
    expiry: Option<oneshot::Receiver<QuizOutcome>>,
}

impl QuizRun {
    pub(crate) fn start(
        course_id: CourseId,
        module_id: ModuleId,
        title: String,
        questions: Vec<Question>,
        duration: Duration,
    ) -> Result<Self, QuizError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| QuizError::NoRuntime)?;
        let questions: Arc<[Question]> = questions.into();
        let sheet = Arc::new(Mutex::new(AnswerSheet::default()));
        let deadline = Instant::now()
            .checked_add(duration)
            .ok_or(QuizError::DurationTooLong {
                secs: duration.as_secs(),
            })?;
        let (tx, rx) = oneshot::channel();

        let countdown = {
            let questions = Arc::clone(&questions);
            let sheet = Arc::clone(&sheet);
            runtime.spawn(async move {
                tokio::time::sleep_until(deadline).await;
                let score = {
                    let mut sheet = lock(&sheet);
                    sheet.closed = true;
                    QuizScore::grade(&questions, &sheet.answers)
                };
                debug!(course_id = %course_id, module_id = %module_id, %score, "quiz expired");
                let _ = tx.send(QuizOutcome {
                    course_id,
                    module_id,
                    score,
                    reason: FinishReason::Expired,
                });
            })
        };

        Ok(Self {
            course_id,
            module_id,
            title,
            questions,
            sheet,
            deadline,
            countdown,
            expiry: Some(rx),
        })
    }

    /// Returns the course the quiz belongs to.
    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    /// Returns the module the quiz belongs to.
    #[must_use]
    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    /// "Course - Module" heading.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the questions in order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Time left before the countdown fires; zero once it has.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Returns true once the countdown has closed the answer sheet.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        lock(&self.sheet).closed
    }

    /// Currently selected option for a question, if any.
    #[must_use]
    pub fn selected(&self, index: usize) -> Option<String> {
        lock(&self.sheet).answers.get(&index).cloned()
    }

    /// Select an option for the question at `index`, replacing any earlier pick.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::UnknownQuestion` / `UnknownOption` for selections
    /// the quiz does not offer, or `QuizError::Expired` once time is up.
    pub fn select(&self, index: usize, option: &str) -> Result<(), QuizError> {
        let question = self
            .questions
            .get(index)
            .ok_or(QuizError::UnknownQuestion { index })?;
        if !question.has_option(option) {
            return Err(QuizError::UnknownOption {
                index,
                option: option.to_owned(),
            });
        }
        let mut sheet = lock(&self.sheet);
        if sheet.closed {
            return Err(QuizError::Expired);
        }
        sheet.answers.insert(index, option.to_owned());
        Ok(())
    }

    /// Stop the countdown and score the current selections.
    ///
    /// If time already ran out, the outcome reports the expiry score.
    #[must_use]
    pub fn submit(self) -> QuizOutcome {
        self.countdown.abort();
        let mut sheet = lock(&self.sheet);
        let reason = if sheet.closed {
            FinishReason::Expired
        } else {
            FinishReason::Submitted
        };
        sheet.closed = true;
        QuizOutcome {
            course_id: self.course_id,
            module_id: self.module_id,
            score: QuizScore::grade(&self.questions, &sheet.answers),
            reason,
        }
    }

    /// Wait until the countdown fires and return the expiry outcome.
    ///
    /// Cancel safe: dropping the future before it completes loses nothing.
    pub async fn expired(&mut self) -> QuizOutcome {
        if let Some(rx) = self.expiry.as_mut() {
            let received = rx.await;
            self.expiry = None;
            if let Ok(outcome) = received {
                return outcome;
            }
        }
        let sheet = lock(&self.sheet);
        QuizOutcome {
            course_id: self.course_id,
            module_id: self.module_id,
            score: QuizScore::grade(&self.questions, &sheet.answers),
            reason: FinishReason::Expired,
        }
    }
}

impl Drop for QuizRun {
    fn drop(&mut self) {
        self.countdown.abort();
    }
}
