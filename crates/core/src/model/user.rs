use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::credentials::PasswordHash;
use crate::model::progress::Progress;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("username cannot be empty")]
    EmptyUsername,
}

/// A registered account and its learning progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    username: String,
    password: PasswordHash,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    progress: Progress,
}

/// Trims an email and maps an empty one to `None`.
#[must_use]
pub fn normalize_email(email: Option<&str>) -> Option<String> {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_owned)
}

impl User {
    /// Create a user with empty progress. The username is trimmed.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyUsername` if the trimmed username is empty.
    pub fn new(
        username: impl AsRef<str>,
        password: PasswordHash,
        email: Option<&str>,
    ) -> Result<Self, UserError> {
        let username = username.as_ref().trim();
        if username.is_empty() {
            return Err(UserError::EmptyUsername);
        }
        Ok(Self {
            username: username.to_owned(),
            password,
            email: normalize_email(email),
            progress: Progress::new(),
        })
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email, if one is set.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the completed modules per course.
    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    /// Checks a plain-text password against the stored hash.
    #[must_use]
    pub fn verify_password(&self, password: &str) -> bool {
        self.password.verify(password)
    }

    /// Replaces the email; blank input clears it.
    pub fn set_email(&mut self, email: Option<&str>) {
        self.email = normalize_email(email);
    }
}
