//! Shared error types for the services crate.

use thiserror::Error;

use lms_core::model::{CourseError, CourseId, CredentialError, ModuleId, NoteError, UserError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Why a registration form was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    #[error("username cannot be empty")]
    EmptyUsername,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("username already taken")]
    UsernameTaken,
}

/// Errors emitted by `AccountService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] RegistrationError),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("no such user: {0}")]
    UnknownUser(String),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("no such course: {0}")]
    UnknownCourse(CourseId),
    #[error("course {course} has no module {module}")]
    UnknownModule { course: CourseId, module: ModuleId },
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("no such user: {0}")]
    UnknownUser(String),
    #[error("no such course: {0}")]
    UnknownCourse(CourseId),
    #[error("course {course} has no module {module}")]
    UnknownModule { course: CourseId, module: ModuleId },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `NotesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NoteServiceError {
    #[error(transparent)]
    Note(#[from] NoteError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while starting or answering a quiz.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no such course: {0}")]
    UnknownCourse(CourseId),
    #[error("course {course} has no module {module}")]
    UnknownModule { course: CourseId, module: ModuleId },
    #[error("module {0} has no quiz")]
    EmptyQuiz(ModuleId),
    #[error("quiz duration of {secs}s is too long")]
    DurationTooLong { secs: u64 },
    #[error("quiz timers need a running Tokio runtime")]
    NoRuntime,
    #[error("question {index} does not exist")]
    UnknownQuestion { index: usize },
    #[error("{option:?} is not an option for question {index}")]
    UnknownOption { index: usize, option: String },
    #[error("time is up for this quiz")]
    Expired,
    #[error("no quiz in progress")]
    NoActiveQuiz,
}

/// Errors emitted by session-aware operations in `AppServices`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("please log in first")]
    NotLoggedIn,
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Note(#[from] NoteServiceError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
