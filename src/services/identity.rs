// src/services/identity.rs

use std::sync::Arc;

use crate::error::AppError;
use crate::models::user::User;
use crate::store::UserStore;
use crate::utils::hash::{hash_password, verify_password};
use crate::utils::jwt::TokenService;

/// Outcome of a successful registration or login.
#[derive(Debug)]
pub struct AuthOutcome {
    pub user_id: uuid::Uuid,
    pub token: String,
}

/// Registration, authentication and deactivation of user accounts.
///
/// A user moves through exactly one state transition: active on
/// registration, inactive on deactivation. There is no reactivation path.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Creates an account and returns its id together with a fresh token.
    ///
    /// The existence probe covers username and email in one query; its
    /// `Conflict` does not say which field collided. The unique indexes
    /// behind [`UserStore::insert_user`] close the probe-then-insert race,
    /// so a racing loser also surfaces as `Conflict`.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, AppError> {
        if self.users.username_or_email_exists(username, email).await? {
            return Err(AppError::Conflict(
                "Username or email already registered".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;
        let user = User::new(username.to_owned(), email.to_owned(), password_hash);
        self.users.insert_user(&user).await?;

        tracing::info!(username = %user.username, "registered new user");

        let token = self.tokens.issue(&user.username)?;

        Ok(AuthOutcome {
            user_id: user.id,
            token,
        })
    }

    /// Verifies a credential pair and issues a fresh token.
    ///
    /// Missing user, deactivated user and wrong password all collapse into
    /// `InvalidCredentials`.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthOutcome, AppError> {
        let user = match self.users.find_user_by_username(username).await? {
            Some(user) if user.is_active => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.username)?;

        Ok(AuthOutcome {
            user_id: user.id,
            token,
        })
    }

    /// Marks the account inactive. Deactivating a missing or already
    /// inactive account is an error, not a no-op.
    pub async fn deactivate(&self, username: &str) -> Result<(), AppError> {
        let user = match self.users.find_user_by_username(username).await? {
            Some(user) if user.is_active => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        self.users.deactivate_user(user.id).await?;

        tracing::info!(username = %user.username, "deactivated user");

        Ok(())
    }

    /// Resolves a bearer subject back to its stored account. A subject whose
    /// row has disappeared is treated as a credential failure.
    pub async fn user_for_subject(&self, username: &str) -> Result<User, AppError> {
        self.users
            .find_user_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)
    }
}
