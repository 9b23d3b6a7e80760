#![forbid(unsafe_code)]

pub mod account_service;
pub mod app_services;
pub mod catalog_service;
pub mod error;
pub mod notes_service;
pub mod progress_service;
pub mod quiz;
pub mod session;
pub mod workspace;

pub use lms_core::Clock;

pub use account_service::{AccountService, MIN_PASSWORD_LEN, Registration};
pub use app_services::AppServices;
pub use catalog_service::CatalogService;
pub use error::{
    AccountError, AppServicesError, CatalogError, NoteServiceError, ProgressError, QuizError,
    RegistrationError, SessionError,
};
pub use notes_service::NotesService;
pub use progress_service::{CourseProgress, ProgressService};
pub use quiz::{FinishReason, QuizOutcome, QuizRun, QuizService, QuizSettings};
pub use session::Session;
pub use workspace::Workspace;
