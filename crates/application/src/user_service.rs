//! Password login and identity assembly.
//!
//! Stored credentials are Argon2id PHC strings. Older accounts may still
//! carry a plaintext credential; it is accepted once and replaced by a hash
//! before the login completes.

use std::sync::Arc;

use hoso_core::UserIdentity;

use crate::{PasswordHasher, PermissionRepository, UserRepository};

mod login;

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials matched; the identity can be stored in the session.
    Authenticated(UserIdentity),
    /// Unknown user or wrong password. Deliberately indistinguishable.
    Failed,
}

/// Application service for user authentication.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    permission_repository: Arc<dyn PermissionRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        permission_repository: Arc<dyn PermissionRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            user_repository,
            permission_repository,
            password_hasher,
        }
    }
}

#[cfg(test)]
mod tests;
