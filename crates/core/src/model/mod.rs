mod course;
mod credentials;
mod document;
mod ids;
mod note;
mod progress;
mod question;
mod user;

pub use course::{Course, CourseError, Module};
pub use credentials::{CredentialError, PasswordHash};
pub use document::Document;
pub use ids::{CourseId, ModuleId, NoteId, ParseIdError};
pub use note::{Note, NoteDraft, NoteError, ValidatedNote};
pub use progress::Progress;
pub use question::{MIN_OPTIONS, Question, QuestionError};
pub use user::{User, UserError, normalize_email};
