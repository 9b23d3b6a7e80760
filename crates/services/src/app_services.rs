use std::sync::Arc;

use lms_core::Clock;
use lms_core::model::{Course, CourseId, Document, Module, ModuleId, Note, NoteDraft, NoteId, User};
use storage::DocumentStore;
use storage::repository::Storage;
use tracing::info;

use crate::account_service::{AccountService, Registration};
use crate::catalog_service::CatalogService;
use crate::error::{AccountError, AppServicesError, QuizError, SessionError};
use crate::notes_service::NotesService;
use crate::progress_service::{CourseProgress, ProgressService};
use crate::quiz::{QuizOutcome, QuizRun, QuizService, QuizSettings};
use crate::session::Session;
use crate::workspace::Workspace;

/// Everything the UI talks to: the workspace, the session, and the services
/// that act on them on behalf of the logged-in user.
pub struct AppServices {
    workspace: Workspace,
    session: Session,
    accounts: AccountService,
    catalog: CatalogService,
    progress: ProgressService,
    notes: NotesService,
    quizzes: QuizService,
}

impl AppServices {
    /// Build services over an already opened workspace.
    #[must_use]
    pub fn new(workspace: Workspace, clock: Clock, quiz: QuizSettings) -> Self {
        Self {
            workspace,
            session: Session::new(),
            accounts: AccountService::new(),
            catalog: CatalogService::new(clock),
            progress: ProgressService::new(),
            notes: NotesService::new(clock),
            quizzes: QuizService::new(quiz),
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the first load
    /// fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        quiz: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let workspace = Workspace::open(DocumentStore::new(Arc::clone(&storage.slots))).await?;
        info!(
            users = workspace.document().users().len(),
            courses = workspace.document().courses().len(),
            "document loaded"
        );
        Ok(Self::new(workspace, clock, quiz))
    }

    /// Build services over fresh in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Storage` if the seed document cannot be built.
    pub async fn in_memory(clock: Clock, quiz: QuizSettings) -> Result<Self, AppServicesError> {
        let workspace = Workspace::in_memory().await?;
        Ok(Self::new(workspace, clock, quiz))
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        self.workspace.document()
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    // ─── Accounts ──────────────────────────────────────────────────────────────

    /// Register and log in as the new user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Account` for validation or storage failures.
    pub async fn register(&mut self, registration: Registration) -> Result<&User, SessionError> {
        let user = self
            .accounts
            .register(&mut self.workspace, registration)
            .await?;
        self.session.login(user.username());
        self.current_user()
    }

    /// # Errors
    ///
    /// Returns `SessionError::Account` with `InvalidCredentials` on mismatch.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&User, SessionError> {
        let user = self
            .accounts
            .authenticate(self.workspace.document(), username, password)?;
        self.session.login(user.username());
        info!(username = user.username(), "logged in");
        self.current_user()
    }

    /// Ends the session, cancelling any running quiz.
    pub fn logout(&mut self) {
        if let Some(username) = self.session.current_user() {
            info!(username, "logged out");
        }
        self.session.logout();
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn` when nobody is logged in.
    pub fn current_user(&self) -> Result<&User, SessionError> {
        let username = self.session.require_user()?;
        self.workspace
            .document()
            .user(username)
            .ok_or_else(|| AccountError::UnknownUser(username.to_owned()).into())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn` or a storage failure.
    pub async fn update_profile(&mut self, email: Option<&str>) -> Result<User, SessionError> {
        let username = self.session.require_user()?.to_owned();
        Ok(self
            .accounts
            .update_profile(&mut self.workspace, &username, email)
            .await?)
    }

    // ─── Catalog ───────────────────────────────────────────────────────────────

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        self.catalog.list_courses(self.workspace.document())
    }

    #[must_use]
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.catalog.course(self.workspace.document(), id)
    }

    #[must_use]
    pub fn module(&self, course_id: CourseId, module_id: ModuleId) -> Option<&Module> {
        self.catalog
            .module(self.workspace.document(), course_id, module_id)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Catalog` when the course does not exist.
    pub fn find_course(&self, id: CourseId) -> Result<&Course, SessionError> {
        Ok(self.catalog.require_course(self.workspace.document(), id)?)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Catalog` when the course or module does not exist.
    pub fn find_module(
        &self,
        course_id: CourseId,
        module_id: ModuleId,
    ) -> Result<&Module, SessionError> {
        Ok(self
            .catalog
            .require_module(self.workspace.document(), course_id, module_id)?)
    }

    pub fn course_names(&self) -> impl Iterator<Item = &str> {
        self.catalog.course_names(self.workspace.document())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn`, or `SessionError::Catalog` for a
    /// blank name or storage failure.
    pub async fn add_course(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<CourseId, SessionError> {
        self.session.require_user()?;
        Ok(self
            .catalog
            .add_course(&mut self.workspace, name, description)
            .await?)
    }

    // ─── Progress ──────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn`.
    pub fn progress_percent(&self, course_id: CourseId) -> Result<f64, SessionError> {
        let user = self.current_user()?;
        Ok(self
            .course(course_id)
            .map_or(0.0, |course| self.progress.progress_percent(course, user)))
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn`.
    pub fn is_module_complete(
        &self,
        course_id: CourseId,
        module_id: ModuleId,
    ) -> Result<bool, SessionError> {
        let user = self.current_user()?;
        Ok(self.progress.is_complete(user, course_id, module_id))
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn`.
    pub fn dashboard(&self) -> Result<Vec<CourseProgress>, SessionError> {
        let user = self.current_user()?;
        Ok(self.progress.dashboard(self.workspace.document(), user))
    }

    /// Mark a module complete for the current user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn` or `SessionError::Progress`.
    pub async fn complete_module(
        &mut self,
        course_id: CourseId,
        module_id: ModuleId,
    ) -> Result<bool, SessionError> {
        let username = self.session.require_user()?.to_owned();
        Ok(self
            .progress
            .mark_complete(&mut self.workspace, &username, course_id, module_id)
            .await?)
    }

    // ─── Quizzes ───────────────────────────────────────────────────────────────

    /// Start a module quiz, cancelling any quiz already running.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn` or `SessionError::Quiz`.
    pub fn start_quiz(
        &mut self,
        course_id: CourseId,
        module_id: ModuleId,
    ) -> Result<&mut QuizRun, SessionError> {
        self.session.require_user()?;
        let run = self
            .quizzes
            .start(self.workspace.document(), course_id, module_id)?;
        Ok(self.session.begin_quiz(run))
    }

    /// Returns the quiz the current session is taking, if any.
    #[must_use]
    pub fn active_quiz(&self) -> Option<&QuizRun> {
        self.session.quiz()
    }

    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuiz` or a selection error.
    pub fn answer(&mut self, index: usize, option: &str) -> Result<(), SessionError> {
        let run = self.session.quiz().ok_or(QuizError::NoActiveQuiz)?;
        Ok(run.select(index, option)?)
    }

    /// Submit the active quiz and end it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoActiveQuiz` when no quiz is running.
    pub fn submit_quiz(&mut self) -> Result<QuizOutcome, SessionError> {
        let run = self.session.take_quiz().ok_or(QuizError::NoActiveQuiz)?;
        let outcome = run.submit();
        info!(score = %outcome.score, "quiz submitted");
        Ok(outcome)
    }

    /// Resolves when the active quiz runs out of time, ending it.
    ///
    /// Never resolves while no quiz is running. Cancel safe.
    pub async fn quiz_expired(&mut self) -> QuizOutcome {
        let Some(run) = self.session.quiz_mut() else {
            return std::future::pending().await;
        };
        let outcome = run.expired().await;
        self.session.take_quiz();
        info!(score = %outcome.score, "quiz timed out");
        outcome
    }

    // ─── Notes ─────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn`, or `SessionError::Note` for blank
    /// fields or storage failure.
    pub async fn add_note(&mut self, course: &str, content: &str) -> Result<NoteId, SessionError> {
        let username = self.session.require_user()?.to_owned();
        Ok(self
            .notes
            .add_note(&mut self.workspace, &username, NoteDraft::new(course, content))
            .await?)
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotLoggedIn`.
    pub fn notes(&self) -> Result<impl Iterator<Item = &Note>, SessionError> {
        let username = self.session.require_user()?;
        Ok(self.notes.list_notes(self.workspace.document(), username))
    }
}
