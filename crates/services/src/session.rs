use crate::error::SessionError;
use crate::quiz::QuizRun;

/// Who is logged in, and the quiz they are taking.
///
/// At most one quiz runs per session; installing a new run drops the old one,
/// which cancels its countdown.
#[derive(Default)]
pub struct Session {
    user: Option<String>,
    quiz: Option<QuizRun>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to `username`, ending any running quiz.
    pub fn login(&mut self, username: impl Into<String>) {
        self.quiz = None;
        self.user = Some(username.into());
    }

    /// Clears the user and cancels any running quiz.
    pub fn logout(&mut self) {
        self.quiz = None;
        self.user = None;
    }

    /// Returns the logged-in username, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn` when nobody is logged in.
    pub fn require_user(&self) -> Result<&str, SessionError> {
        self.current_user().ok_or(SessionError::NotLoggedIn)
    }

    /// Install a new quiz run, cancelling any previous one.
    pub fn begin_quiz(&mut self, run: QuizRun) -> &mut QuizRun {
        self.quiz.insert(run)
    }

    /// Returns the running quiz, if any.
    #[must_use]
    pub fn quiz(&self) -> Option<&QuizRun> {
        self.quiz.as_ref()
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizRun> {
        self.quiz.as_mut()
    }

    /// Removes the running quiz from the session.
    pub fn take_quiz(&mut self) -> Option<QuizRun> {
        self.quiz.take()
    }
}
