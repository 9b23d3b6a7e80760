use lms_core::Clock;
use lms_core::model::{Document, Note, NoteDraft, NoteId};
use tracing::debug;

use crate::error::NoteServiceError;
use crate::workspace::Workspace;

/// Per-user notes tagged by course name.
#[derive(Clone, Copy, Debug)]
pub struct NotesService {
    clock: Clock,
}

impl NotesService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    /// Append a note for `username`.
    ///
    /// # Errors
    ///
    /// Returns `NoteServiceError::Note` when the course or content is blank
    /// (nothing is saved), or `NoteServiceError::Storage` if the save fails.
    pub async fn add_note(
        &self,
        workspace: &mut Workspace,
        username: &str,
        draft: NoteDraft,
    ) -> Result<NoteId, NoteServiceError> {
        let validated = draft.validate()?;
        let id = NoteId::new(self.clock.next_id_after(workspace.document().last_note_id()));
        let note = validated.assign(id, username);

        workspace
            .commit(|doc| {
                doc.push_note(note);
                Ok::<_, NoteServiceError>(())
            })
            .await?;

        debug!(username, note_id = %id, "note added");
        Ok(id)
    }

    /// The user's notes in insertion order. Each call filters afresh.
    pub fn list_notes<'a>(
        &self,
        doc: &'a Document,
        username: &'a str,
    ) -> impl Iterator<Item = &'a Note> + 'a {
        doc.notes_for(username)
    }
}
