use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::NoteId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NoteError {
    #[error("a note needs a course")]
    EmptyCourse,

    #[error("note content cannot be empty")]
    EmptyContent,
}

/// Unvalidated note input as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub course: String,
    pub content: String,
}

impl NoteDraft {
    #[must_use]
    pub fn new(course: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            course: course.into(),
            content: content.into(),
        }
    }

    /// Trim both fields and reject blanks.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::EmptyCourse` or `NoteError::EmptyContent`.
    pub fn validate(self) -> Result<ValidatedNote, NoteError> {
        let course = self.course.trim();
        if course.is_empty() {
            return Err(NoteError::EmptyCourse);
        }
        let content = self.content.trim();
        if content.is_empty() {
            return Err(NoteError::EmptyContent);
        }
        Ok(ValidatedNote {
            course: course.to_owned(),
            content: content.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedNote {
    course: String,
    content: String,
}

impl ValidatedNote {
    #[must_use]
    pub fn assign(self, id: NoteId, user: impl Into<String>) -> Note {
        Note {
            id,
            user: user.into(),
            course: self.course,
            content: self.content,
        }
    }
}

/// A free-text note, tagged with a course by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    user: String,
    course: String,
    content: String,
}

impl Note {
    /// Returns the note id.
    #[must_use]
    pub fn id(&self) -> NoteId {
        self.id
    }

    /// Returns the author's username.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the course name the note is filed under.
    #[must_use]
    pub fn course(&self) -> &str {
        &self.course
    }

    /// Returns the trimmed note text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
