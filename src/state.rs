// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{Authenticator, TokenKeys};
use crate::courses::CourseManager;
use crate::storage::CourseDatabase;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<CourseDatabase>,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(db: CourseDatabase, tokens: TokenKeys) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
        }
    }

    pub fn authenticator(&self) -> Authenticator<'_> {
        Authenticator::new(&self.db, &self.tokens)
    }

    pub fn courses(&self) -> CourseManager<'_> {
        CourseManager::new(&self.db)
    }

    /// State backed by a throwaway database, for tests.
    #[cfg(test)]
    pub fn temporary() -> (Self, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let db = CourseDatabase::open(&dir.path().join("test.redb")).expect("Failed to open db");
        (Self::new(db, TokenKeys::from_secret("test-secret")), dir)
    }
}
