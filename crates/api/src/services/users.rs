//! User registration, mutation, and access-controlled reads.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use cantina_core::{Email, EmailError, Roles, UserId};

use super::authz;
use crate::models::{Actor, NewUser, User};
use crate::store::{StoreError, UserStore};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 4;

/// Errors from user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// The submitted email does not parse.
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),

    /// The submitted password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// The email is already registered to another account.
    #[error("email is already registered")]
    EmailTaken,

    /// An update carried no email, password, or roles field.
    #[error("nothing to update")]
    NothingToUpdate,

    /// The authorization policy rejected the operation.
    #[error("forbidden")]
    Forbidden,

    /// No user matches the given identifier.
    #[error("user not found")]
    NotFound,

    /// Hashing the password failed.
    #[error("failed to hash password")]
    PasswordHash,

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fields accepted when registering a user.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    /// Roles are stored as submitted; absent means non-admin.
    pub roles: Option<Roles>,
}

/// Fields accepted when updating a user; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Roles>,
}

impl UserChanges {
    fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.roles.is_none()
    }
}

/// User service.
///
/// Validates mutations, applies the authorization policy, and resolves
/// targets by ID or email before touching the store.
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `UserError::InvalidEmail` / `UserError::WeakPassword` for bad
    /// credentials and `UserError::EmailTaken` when the email exists.
    pub async fn register(&self, req: RegisterUser) -> Result<User, UserError> {
        let email = Email::parse(&req.email)?;
        validate_password(&req.password)?;
        let password_hash = hash_password(&req.password)?;
        let roles = req.roles.unwrap_or_default();

        let id = self
            .users
            .create(&NewUser {
                email,
                password_hash,
                roles,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => UserError::EmailTaken,
                other => UserError::Store(other),
            })?;

        self.users.get_by_id(id).await?.ok_or(UserError::NotFound)
    }

    /// Resolve a target user from an identifier that may be a store ID or an
    /// email address. ID lookup is tried first, email second.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` when neither lookup resolves.
    pub async fn resolve(&self, identifier: &str) -> Result<User, UserError> {
        if let Ok(id) = identifier.parse::<UserId>()
            && let Some(user) = self.users.get_by_id(id).await?
        {
            return Ok(user);
        }

        self.users
            .get_by_email(identifier)
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Fetch a user the actor is allowed to see.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` for unknown targets and
    /// `UserError::Forbidden` when the actor is neither the target nor admin.
    pub async fn get(&self, actor: &Actor, identifier: &str) -> Result<User, UserError> {
        let target = self.resolve(identifier).await?;
        if !authz::can_view(actor, &target) {
            return Err(UserError::Forbidden);
        }
        Ok(target)
    }

    /// Apply a partial update to a user the actor is allowed to mutate.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Forbidden` for identity or role-change violations,
    /// `UserError::NothingToUpdate` for an empty change-set, and validation
    /// errors for bad fields. Nothing is persisted on failure.
    pub async fn update(
        &self,
        actor: &Actor,
        identifier: &str,
        changes: UserChanges,
    ) -> Result<User, UserError> {
        let target = self.resolve(identifier).await?;
        if !authz::can_mutate(actor, &target) {
            return Err(UserError::Forbidden);
        }
        if !authz::role_change_allowed(actor, &target, changes.roles) {
            return Err(UserError::Forbidden);
        }
        if changes.is_empty() {
            return Err(UserError::NothingToUpdate);
        }

        let email = match changes.email.as_deref() {
            Some(raw) => Email::parse(raw)?,
            None => target.email.clone(),
        };
        let password_hash = match changes.password.as_deref() {
            Some(raw) => {
                validate_password(raw)?;
                hash_password(raw)?
            }
            None => target.password_hash.clone(),
        };
        let roles = changes.roles.unwrap_or(target.roles);

        let updated = User {
            id: target.id,
            email,
            password_hash,
            roles,
        };
        self.users
            .update(target.id, &updated)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => UserError::EmailTaken,
                other => UserError::Store(other),
            })?;

        Ok(updated)
    }

    /// Delete a user the actor is allowed to mutate, returning the record as
    /// it existed before deletion.
    ///
    /// # Errors
    ///
    /// Returns `UserError::NotFound` / `UserError::Forbidden` as for `get`.
    pub async fn delete(&self, actor: &Actor, identifier: &str) -> Result<User, UserError> {
        let target = self.resolve(identifier).await?;
        if !authz::can_mutate(actor, &target) {
            return Err(UserError::Forbidden);
        }
        self.users.delete(target.id).await?;
        Ok(target)
    }

    /// List users for one page.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Store` when the store fails.
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, UserError> {
        Ok(self.users.list_paged(skip, limit).await?)
    }

    /// Total number of users.
    ///
    /// # Errors
    ///
    /// Returns `UserError::Store` when the store fails.
    pub async fn count(&self) -> Result<i64, UserError> {
        Ok(self.users.count().await?)
    }

    /// Seed an administrative account at startup when no user exists for the
    /// configured email.
    ///
    /// # Errors
    ///
    /// Returns validation or store errors; callers log and continue.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), UserError> {
        let email = Email::parse(email)?;
        if self.users.get_by_email(email.as_str()).await?.is_some() {
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        self.users
            .create(&NewUser {
                email,
                password_hash,
                roles: Roles::administrator(),
            })
            .await?;
        Ok(())
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), UserError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserError::WeakPassword);
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| UserError::PasswordHash)
}
