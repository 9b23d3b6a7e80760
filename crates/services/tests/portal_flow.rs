use std::sync::Arc;

use lms_core::model::{CourseId, ModuleId};
use lms_core::time::fixed_clock;
use services::{
    AccountError, AppServices, FinishReason, NoteServiceError, QuizSettings, Registration,
    RegistrationError, SessionError, Workspace,
};
use storage::DocumentStore;
use storage::repository::InMemorySlots;

const MATH: CourseId = CourseId::new(1);

async fn app_over(slots: &InMemorySlots) -> AppServices {
    let workspace = Workspace::open(DocumentStore::new(Arc::new(slots.clone())))
        .await
        .expect("open workspace");
    AppServices::new(workspace, fixed_clock(), QuizSettings::default())
}

#[tokio::test]
async fn student_logs_in_and_aces_the_algebra_quiz() {
    let mut app = AppServices::in_memory(fixed_clock(), QuizSettings::default())
        .await
        .unwrap();

    let user = app.login("student", "pass123").unwrap();
    assert_eq!(user.username(), "student");

    let module = app.module(MATH, ModuleId::new(1)).unwrap();
    assert_eq!(module.name(), "Basic Algebra");

    let run = app.start_quiz(MATH, ModuleId::new(1)).unwrap();
    assert_eq!(run.title(), "Mathematics 101 - Basic Algebra");
    assert_eq!(run.questions().len(), 2);

    app.answer(0, "12").unwrap();
    app.answer(1, "12").unwrap();
    let outcome = app.submit_quiz().unwrap();
    assert_eq!(outcome.reason, FinishReason::Submitted);
    assert_eq!(outcome.score.to_string(), "2/2");
    assert!(app.active_quiz().is_none());
}

#[tokio::test]
async fn blank_note_is_not_appended() {
    let mut app = AppServices::in_memory(fixed_clock(), QuizSettings::default())
        .await
        .unwrap();
    app.login("student", "pass123").unwrap();

    let err = app.add_note("Mathematics 101", "").await.unwrap_err();
    assert!(matches!(err, SessionError::Note(NoteServiceError::Note(_))));
    assert_eq!(app.notes().unwrap().count(), 0);
    assert!(app.document().notes().is_empty());
}

#[tokio::test]
async fn operations_require_login() {
    let mut app = AppServices::in_memory(fixed_clock(), QuizSettings::default())
        .await
        .unwrap();

    assert!(matches!(app.dashboard(), Err(SessionError::NotLoggedIn)));
    assert!(matches!(
        app.complete_module(MATH, ModuleId::new(1)).await,
        Err(SessionError::NotLoggedIn)
    ));
    assert!(matches!(
        app.start_quiz(MATH, ModuleId::new(1)),
        Err(SessionError::NotLoggedIn)
    ));
    assert!(matches!(
        app.add_note("Mathematics 101", "x").await,
        Err(SessionError::NotLoggedIn)
    ));
}

#[tokio::test]
async fn bad_login_leaves_session_empty() {
    let mut app = AppServices::in_memory(fixed_clock(), QuizSettings::default())
        .await
        .unwrap();
    let err = app.login("student", "wrong-password").unwrap_err();
    assert!(matches!(
        err,
        SessionError::Account(AccountError::InvalidCredentials)
    ));
    assert!(app.session().current_user().is_none());
}

#[tokio::test]
async fn registered_user_progress_survives_restart() {
    let slots = InMemorySlots::new();

    {
        let mut app = app_over(&slots).await;
        let user = app
            .register(Registration::new(
                "ada",
                "lovelace",
                "lovelace",
                Some("ada@example.com".into()),
            ))
            .await
            .unwrap();
        assert!(user.progress().is_empty());
        assert_eq!(app.session().current_user(), Some("ada"));

        assert!(app.complete_module(MATH, ModuleId::new(1)).await.unwrap());
        assert!(!app.complete_module(MATH, ModuleId::new(1)).await.unwrap());
        assert!((app.progress_percent(MATH).unwrap() - 50.0).abs() < f64::EPSILON);

        app.add_note(" Mathematics 101 ", " linear equations ").await.unwrap();
        app.update_profile(Some("ada@lovelace.dev")).await.unwrap();
        app.logout();
        assert!(app.session().current_user().is_none());
    }

    let mut app = app_over(&slots).await;
    let user = app.login("ada", "lovelace").unwrap();
    assert_eq!(user.email(), Some("ada@lovelace.dev"));
    assert!(app.is_module_complete(MATH, ModuleId::new(1)).unwrap());
    assert!(!app.is_module_complete(MATH, ModuleId::new(2)).unwrap());

    let notes: Vec<(String, String)> = app
        .notes()
        .unwrap()
        .map(|n| (n.course().to_owned(), n.content().to_owned()))
        .collect();
    assert_eq!(
        notes,
        vec![("Mathematics 101".to_owned(), "linear equations".to_owned())]
    );

    let rows = app.dashboard().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!((rows[0].completed, rows[0].total), (1, 2));
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let mut app = AppServices::in_memory(fixed_clock(), QuizSettings::default())
        .await
        .unwrap();
    let err = app
        .register(Registration::new("student", "another1", "another1", None))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Account(AccountError::Validation(RegistrationError::UsernameTaken))
    ));
    assert!(app.session().current_user().is_none());
}

#[tokio::test]
async fn new_course_shows_on_dashboard_with_zero_progress() {
    let mut app = AppServices::in_memory(fixed_clock(), QuizSettings::default())
        .await
        .unwrap();
    app.login("student", "pass123").unwrap();

    let id = app.add_course("Physics", "Waves").await.unwrap();
    assert!(app.progress_percent(id).unwrap().abs() < f64::EPSILON);
    assert_eq!(
        app.course_names().collect::<Vec<_>>(),
        vec!["Mathematics 101", "Physics"]
    );

    let rows = app.dashboard().unwrap();
    assert_eq!(rows[1].course_id, id);
    assert_eq!(rows[1].total, 0);
}
