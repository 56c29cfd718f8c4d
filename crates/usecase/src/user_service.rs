//! User lifecycle service.

use std::time::Duration;

use common::UserId;
use domain::User;

use crate::deadline::{DEFAULT_OPERATION_DEADLINE, observe_failure, within};
use crate::error::AppError;
use crate::ports::UserRepository;

/// Orchestrates user creation, lookup and avatar assignment.
///
/// Stateless apart from its repository handle; safe to share between
/// concurrent requests.
pub struct UserService<R: UserRepository> {
    repo: R,
    deadline: Duration,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service with the default operation deadline.
    pub fn new(repo: R) -> Self {
        Self::with_deadline(repo, DEFAULT_OPERATION_DEADLINE)
    }

    /// Creates a service with a custom operation deadline.
    pub fn with_deadline(repo: R, deadline: Duration) -> Self {
        Self { repo, deadline }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Builds, validates and stores a new user.
    #[tracing::instrument(skip(self, email))]
    pub async fn create_user(&self, name: &str, email: &str) -> Result<User, AppError> {
        let mut user = User::new(name, email);
        user.validate()
            .map_err(|e| observe_failure("create_user", e.into()))?;

        within(self.deadline, "create_user", self.repo.save(&mut user))
            .await
            .map_err(|e| observe_failure("create_user", e))?;

        metrics::counter!("users_created_total").increment(1);
        tracing::info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    /// Loads a user by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, id: UserId) -> Result<User, AppError> {
        within(self.deadline, "get_user", self.repo.find_by_id(id))
            .await
            .map_err(|e| observe_failure("get_user", e))
    }

    /// Assigns an avatar reference to an existing user.
    ///
    /// The lookup and the write share a single deadline.
    #[tracing::instrument(skip(self))]
    pub async fn update_avatar(&self, id: UserId, avatar_url: &str) -> Result<User, AppError> {
        let repo = &self.repo;
        let user = within(self.deadline, "update_avatar", async move {
            let mut user = repo.find_by_id(id).await?;
            user.update_avatar(avatar_url);
            repo.update(&user).await?;
            Ok(user)
        })
        .await
        .map_err(|e| observe_failure("update_avatar", e))?;

        tracing::info!(user_id = %id, "avatar updated");
        Ok(user)
    }
}
