// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account registration, login, and per-request token resolution.

use thiserror::Error;
use tracing::{info, warn};

use super::claims::AuthenticatedUser;
use super::error::AuthError;
use super::password::{hash_password, verify_password, PasswordError};
use super::tokens::{TokenKeys, TOKEN_SCHEME};
use crate::models::{LoginRequest, RegisterRequest};
use crate::storage::{CourseDatabase, StoreError, StoredUser, UserRepository};
use crate::validation::{validate_login, validate_registration, ValidationError};

/// Failure of a register or login call.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Email is already registered.")]
    EmailTaken,

    #[error("No account is registered with this email.")]
    UnknownEmail,

    #[error("Incorrect password.")]
    WrongPassword,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(AuthError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(_) => AccountError::EmailTaken,
            other => AccountError::Store(other),
        }
    }
}

/// Successful login: the `JWT <token>` string and the account.
#[derive(Debug)]
pub struct Session {
    pub token: String,
    pub user: StoredUser,
}

/// Verifies credentials and issues or resolves session tokens.
pub struct Authenticator<'a> {
    db: &'a CourseDatabase,
    keys: &'a TokenKeys,
}

impl<'a> Authenticator<'a> {
    pub fn new(db: &'a CourseDatabase, keys: &'a TokenKeys) -> Self {
        Self { db, keys }
    }

    /// Create an account. The password is stored as an argon2 hash.
    pub fn register(&self, request: &RegisterRequest) -> Result<StoredUser, AccountError> {
        let role = validate_registration(request)?;
        let users = UserRepository::new(self.db);
        if users.email_exists(&request.email)? {
            return Err(AccountError::EmailTaken);
        }

        let hash = hash_password(&request.password)?;
        let user = StoredUser::new(&request.email, request.username.clone(), hash, role);
        // The repository re-checks the email inside its write transaction
        users.create(&user)?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Check credentials and sign a token binding (user id, email).
    pub fn login(&self, request: &LoginRequest) -> Result<Session, AccountError> {
        validate_login(request)?;
        let user = UserRepository::new(self.db)
            .find_by_email(&request.email)?
            .ok_or_else(|| {
                warn!("Login attempt for unregistered email");
                AccountError::UnknownEmail
            })?;

        if !verify_password(&request.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AccountError::WrongPassword);
        }

        let jwt = self
            .keys
            .issue(&user.id, &user.email)
            .map_err(AccountError::Token)?;
        info!(user_id = %user.id, "User logged in");
        Ok(Session {
            token: format!("{TOKEN_SCHEME} {jwt}"),
            user,
        })
    }

    /// Resolve a bare token to the caller's current account.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.keys.verify(token)?;
        let user = UserRepository::new(self.db)
            .get(&claims.sub)
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .ok_or(AuthError::UnknownUser)?;
        Ok(AuthenticatedUser::from(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use tempfile::TempDir;

    fn setup() -> (CourseDatabase, TokenKeys, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = CourseDatabase::open(&dir.path().join("auth.redb")).expect("Failed to open db");
        (db, TokenKeys::from_secret("test-secret"), dir)
    }

    fn registration(email: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            username: "alice".into(),
            password: "hunter22".into(),
            role: role.into(),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn register_hashes_password() {
        let (db, keys, _dir) = setup();
        let auth = Authenticator::new(&db, &keys);

        let user = auth.register(&registration("alice@example.com", "instructor")).unwrap();
        assert_eq!(user.role, Role::Instructor);
        assert_ne!(user.password_hash, "hunter22");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[test]
    fn second_registration_with_same_email_fails() {
        let (db, keys, _dir) = setup();
        let auth = Authenticator::new(&db, &keys);

        auth.register(&registration("alice@example.com", "student")).unwrap();
        let err = auth.register(&registration("ALICE@example.com", "instructor")).unwrap_err();
        assert!(matches!(err, AccountError::EmailTaken));
    }

    #[test]
    fn invalid_registration_is_a_validation_error() {
        let (db, keys, _dir) = setup();
        let auth = Authenticator::new(&db, &keys);

        let err = auth.register(&registration("alice@example.com", "admin")).unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }

    #[test]
    fn login_issues_resolvable_token() {
        let (db, keys, _dir) = setup();
        let auth = Authenticator::new(&db, &keys);
        let user = auth.register(&registration("alice@example.com", "student")).unwrap();

        let session = auth.login(&login("alice@example.com", "hunter22")).unwrap();
        assert_eq!(session.user.id, user.id);

        let jwt = session.token.strip_prefix("JWT ").expect("JWT scheme prefix");
        let caller = auth.authenticate(jwt).unwrap();
        assert_eq!(caller.user_id, user.id);
        assert_eq!(caller.role, Role::Student);
    }

    #[test]
    fn login_failures() {
        let (db, keys, _dir) = setup();
        let auth = Authenticator::new(&db, &keys);
        auth.register(&registration("alice@example.com", "student")).unwrap();

        let err = auth.login(&login("bob@example.com", "hunter22")).unwrap_err();
        assert!(matches!(err, AccountError::UnknownEmail));

        let err = auth.login(&login("alice@example.com", "wrong-password")).unwrap_err();
        assert!(matches!(err, AccountError::WrongPassword));
    }

    #[test]
    fn token_for_missing_user_is_rejected() {
        let (db, keys, _dir) = setup();
        let auth = Authenticator::new(&db, &keys);

        let jwt = keys.issue("no-such-user", "ghost@example.com").unwrap();
        assert_eq!(auth.authenticate(&jwt).unwrap_err(), AuthError::UnknownUser);
        assert_eq!(auth.authenticate("garbage").unwrap_err(), AuthError::MalformedToken);
    }
}
