use lms_core::model::{Document, PasswordHash, User};
use tracing::{info, warn};

use crate::error::{AccountError, RegistrationError};
use crate::workspace::Workspace;

/// Shortest password accepted at registration, counted in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: Option<String>,
}

impl Registration {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            email,
        }
    }

    /// Check the form against the directory.
    ///
    /// # Errors
    ///
    /// Returns the first failing `RegistrationError`, checked in the order
    /// empty username, password mismatch, password length, username taken.
    pub fn validate(&self, directory: &Document) -> Result<(), RegistrationError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(RegistrationError::EmptyUsername);
        }
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if directory.has_user(username) {
            return Err(RegistrationError::UsernameTaken);
        }
        Ok(())
    }
}

/// Account directory: registration, login checks, and profile edits.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccountService;

impl AccountService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Register a new user with empty progress and persist it.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` for rejected input,
    /// `AccountError::Credential` if hashing fails, or
    /// `AccountError::Storage` if the save fails.
    pub async fn register(
        &self,
        workspace: &mut Workspace,
        registration: Registration,
    ) -> Result<User, AccountError> {
        registration.validate(workspace.document())?;
        let hash = PasswordHash::generate(&registration.password)?;
        let user = User::new(&registration.username, hash, registration.email.as_deref())?;

        let created = workspace
            .commit(|doc| {
                doc.push_user(user.clone());
                Ok::<_, AccountError>(user)
            })
            .await?;

        info!(username = created.username(), "user registered");
        Ok(created)
    }

    /// Find the user matching both username and password.
    ///
    /// Unknown users and wrong passwords are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidCredentials` when no pair matches.
    pub fn authenticate<'a>(
        &self,
        directory: &'a Document,
        username: &str,
        password: &str,
    ) -> Result<&'a User, AccountError> {
        let username = username.trim();
        match directory.user(username) {
            Some(user) if user.verify_password(password) => Ok(user),
            _ => {
                warn!(username, "rejected login");
                Err(AccountError::InvalidCredentials)
            }
        }
    }

    /// Replace a user's email. Blank input clears it.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UnknownUser` if the user is missing, or
    /// `AccountError::Storage` if the save fails.
    pub async fn update_profile(
        &self,
        workspace: &mut Workspace,
        username: &str,
        email: Option<&str>,
    ) -> Result<User, AccountError> {
        let updated = workspace
            .commit(|doc| {
                let user = doc
                    .user_mut(username)
                    .ok_or_else(|| AccountError::UnknownUser(username.to_owned()))?;
                user.set_email(email);
                Ok::<_, AccountError>(user.clone())
            })
            .await?;
        info!(username, "profile updated");
        Ok(updated)
    }
}
