use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::course::{Course, Module};
use crate::model::credentials::PasswordHash;
use crate::model::ids::{CourseId, ModuleId};
use crate::model::note::Note;
use crate::model::question::Question;
use crate::model::user::User;

/// Root aggregate holding every user, course, and note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    notes: Vec<Note>,
}

impl Document {
    /// A document with no users, courses or notes.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The starter document used when storage holds nothing usable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Credential` if hashing the seed password fails.
    pub fn seed() -> Result<Self, Error> {
        let password = PasswordHash::generate(seed::PASSWORD)?;
        Ok(Self {
            users: vec![seed::user(password)?],
            courses: vec![seed::course()?],
            notes: Vec::new(),
        })
    }

    // Users

    /// Returns all users in registration order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Finds a user by exact, case-sensitive username.
    #[must_use]
    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username() == username)
    }

    /// Mutable variant of [`Self::user`].
    pub fn user_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.username() == username)
    }

    /// Returns true if the username is taken.
    #[must_use]
    pub fn has_user(&self, username: &str) -> bool {
        self.user(username).is_some()
    }

    pub fn push_user(&mut self, user: User) {
        self.users.push(user);
    }

    // Courses

    /// Returns all courses in catalog order.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Finds a course by id.
    #[must_use]
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id() == id)
    }

    /// Finds a module of a course.
    #[must_use]
    pub fn module(&self, course_id: CourseId, module_id: ModuleId) -> Option<&Module> {
        self.course(course_id).and_then(|c| c.module(module_id))
    }

    /// Largest course id in use, if any.
    #[must_use]
    pub fn last_course_id(&self) -> Option<u64> {
        self.courses.iter().map(|c| c.id().value()).max()
    }

    pub fn push_course(&mut self, course: Course) {
        self.courses.push(course);
    }

    // Notes

    /// Returns every note in insertion order.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes written by `username`, in insertion order.
    pub fn notes_for<'a>(&'a self, username: &'a str) -> impl Iterator<Item = &'a Note> + 'a {
        self.notes.iter().filter(move |n| n.user() == username)
    }

    /// Largest note id in use, if any.
    #[must_use]
    pub fn last_note_id(&self) -> Option<u64> {
        self.notes.iter().map(|n| n.id().value()).max()
    }

    pub fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }
}

mod seed {
    use super::{Course, CourseId, Module, ModuleId, PasswordHash, Question, User};
    use crate::Error;

    pub(super) const USERNAME: &str = "student";
    pub(super) const PASSWORD: &str = "pass123";
    const EMAIL: &str = "student@example.com";

    pub(super) fn user(password: PasswordHash) -> Result<User, Error> {
        Ok(User::new(USERNAME, password, Some(EMAIL))?)
    }

    fn question(text: &str, options: [&str; 4], answer: &str) -> Result<Question, Error> {
        Ok(Question::new(text, options, answer)?)
    }

    fn module(id: u64, name: &str, content: &str, quiz: Vec<Question>) -> Result<Module, Error> {
        Ok(Module::new(ModuleId::new(id), name, content, quiz)?)
    }

    pub(super) fn course() -> Result<Course, Error> {
        let modules = vec![
            module(
                1,
                "Basic Algebra",
                "Learn variables, equations, solving linear equations, and basic functions.",
                vec![
                    question("What is 5 + 7?", ["10", "11", "12", "13"], "12")?,
                    question("Solve: x - 3 = 9", ["10", "11", "12", "13"], "12")?,
                ],
            )?,
            module(
                2,
                "Geometry Basics",
                "Study shapes, angles, area, perimeter, and basic theorems.",
                vec![question(
                    "A triangle has how many sides?",
                    ["3", "4", "5", "6"],
                    "3",
                )?],
            )?,
        ];
        let course = Course::new(
            CourseId::new(1),
            "Mathematics 101",
            "Introduction to Algebra and Geometry",
        )?
        .with_modules(modules)?;
        Ok(course)
    }
}
