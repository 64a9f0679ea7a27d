// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User (credential) repository.
//!
//! Users are keyed by id; a second table maps the normalized email to the id
//! so email uniqueness is enforced at write time.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::super::database::{CourseDatabase, StoreError, StoreResult, USERS, USER_EMAILS};
use crate::auth::Role;

/// User record as persisted. Holds the argon2 hash, never the password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub id: String,
    pub username: String,
    /// Normalized (trimmed, lower-cased) email
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn new(
        email: &str,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            email: normalize_email(email),
            password_hash: password_hash.into(),
            role,
            created_at: Utc::now(),
        }
    }
}

/// Canonical form of an email used for the uniqueness index and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a CourseDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a CourseDatabase) -> Self {
        Self { db }
    }

    /// Insert a new user.
    ///
    /// The email index is checked and written in the same write transaction,
    /// so two concurrent registrations with one email cannot both succeed.
    pub fn create(&self, user: &StoredUser) -> StoreResult<()> {
        let email = normalize_email(&user.email);
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.inner().begin_write()?;
        {
            let mut emails = write_txn.open_table(USER_EMAILS)?;
            if emails.get(email.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!("User with email {email}")));
            }
            emails.insert(email.as_str(), user.id.as_str())?;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(user.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a user by id.
    pub fn get(&self, user_id: &str) -> StoreResult<Option<StoredUser>> {
        let read_txn = self.db.inner().begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Find a user by email (normalized before lookup).
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredUser>> {
        let email = normalize_email(email);
        let read_txn = self.db.inner().begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS)?;

        let user_id = match emails.get(email.as_str())? {
            Some(id) => id.value().to_string(),
            None => return Ok(None),
        };

        let users = read_txn.open_table(USERS)?;
        match users.get(user_id.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => {
                tracing::warn!(user_id = %user_id, "Email index points at a missing user");
                Ok(None)
            }
        }
    }

    /// Whether an email is already registered.
    pub fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let email = normalize_email(email);
        let read_txn = self.db.inner().begin_read()?;
        let emails = read_txn.open_table(USER_EMAILS)?;
        Ok(emails.get(email.as_str())?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_db() -> (CourseDatabase, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = CourseDatabase::open(&dir.path().join("users.redb")).expect("Failed to open db");
        (db, dir)
    }

    fn test_user(email: &str) -> StoredUser {
        StoredUser::new(email, "alice", "$argon2id$fake", Role::Student)
    }

    #[test]
    fn create_and_get_user() {
        let (db, _dir) = test_db();
        let repo = UserRepository::new(&db);

        let user = test_user("alice@example.com");
        repo.create(&user).unwrap();

        let loaded = repo.get(&user.id).unwrap().expect("user exists");
        assert_eq!(loaded, user);
        assert!(repo.get("missing").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (db, _dir) = test_db();
        let repo = UserRepository::new(&db);

        repo.create(&test_user("alice@example.com")).unwrap();
        let result = repo.create(&test_user("alice@example.com"));
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn email_lookup_is_normalized() {
        let (db, _dir) = test_db();
        let repo = UserRepository::new(&db);

        let user = test_user("Alice@Example.com ");
        assert_eq!(user.email, "alice@example.com");
        repo.create(&user).unwrap();

        let found = repo.find_by_email("ALICE@example.COM").unwrap().expect("found");
        assert_eq!(found.id, user.id);
        assert!(repo.email_exists("alice@example.com").unwrap());
        assert!(!repo.email_exists("bob@example.com").unwrap());

        let result = repo.create(&test_user("alice@EXAMPLE.com"));
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
    }
}
