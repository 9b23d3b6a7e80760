use thiserror::Error;

use crate::model::{CourseError, CredentialError, NoteError, QuestionError, UserError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Note(#[from] NoteError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
}
