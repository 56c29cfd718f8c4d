//! User entity.

use chrono::{DateTime, Utc};
use common::UserId;

use crate::error::DomainError;
use crate::validation::{has_email_shape, is_blank};

/// A registered user.
///
/// Created through [`User::new`], which assigns a fresh identifier and
/// creation timestamp. The only mutation is avatar assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    avatar_url: String,
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with a generated ID and the current timestamp.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            avatar_url: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Rebuilds a user from persisted state.
    pub fn restore(
        id: UserId,
        name: String,
        email: String,
        avatar_url: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            avatar_url,
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the avatar reference, empty until one is assigned.
    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Assigns the avatar reference (storage key or URL).
    pub fn update_avatar(&mut self, avatar_url: impl Into<String>) {
        self.avatar_url = avatar_url.into();
    }

    /// Checks the name and email rules, in that order.
    pub fn validate(&self) -> Result<(), DomainError> {
        if is_blank(&self.name) {
            return Err(DomainError::InvalidUser("name is required"));
        }

        if is_blank(&self.email) {
            return Err(DomainError::InvalidUser("email is required"));
        }

        if !has_email_shape(&self.email) {
            return Err(DomainError::InvalidUser("email format is invalid"));
        }

        Ok(())
    }
}
