// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded course and credential database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `user_emails`: normalized email → user_id (uniqueness index)
//! - `courses`: course_id → serialized StoredCourse
//!
//! redb serializes write transactions, so any read-check-write performed
//! inside one write transaction is atomic with respect to other writers.

use std::path::Path;

use redb::{Database, ReadableDatabase, TableDefinition};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary user table: user_id → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Uniqueness index: normalized email → user_id.
pub(crate) const USER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("user_emails");

/// Primary course table: course_id → serialized StoredCourse (JSON bytes).
pub(crate) const COURSES: TableDefinition<&str, &[u8]> = TableDefinition::new("courses");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// CourseDatabase
// =============================================================================

/// Embedded ACID store holding users and courses.
pub struct CourseDatabase {
    db: Database,
}

impl CourseDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAILS)?;
            let _ = write_txn.open_table(COURSES)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Course database opened");
        Ok(Self { db })
    }

    pub(crate) fn inner(&self) -> &Database {
        &self.db
    }

    /// Verify the database can serve a read transaction.
    pub fn health_check(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        let _ = read_txn.open_table(COURSES)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_parent_directories_and_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("courses.redb");

        let db = CourseDatabase::open(&path).unwrap();
        assert!(path.exists());
        assert!(db.health_check().is_ok());
    }

    #[test]
    fn reopen_existing_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("courses.redb");

        drop(CourseDatabase::open(&path).unwrap());
        let db = CourseDatabase::open(&path).unwrap();
        assert!(db.health_check().is_ok());
    }
}
