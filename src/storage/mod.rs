// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persistent storage for users and courses in an embedded redb database.
//!
//! ## Consistency Model
//!
//! - Each operation is a single read or write transaction
//! - Writers are serialized by redb, so a guard evaluated inside a write
//!   transaction still holds when the write commits
//! - Email uniqueness and roster membership are enforced inside the
//!   transaction that writes them

pub mod database;
pub mod repository;

pub use database::{CourseDatabase, StoreError, StoreResult};
pub use repository::{
    normalize_email, CourseFilter, CourseRepository, StoredCourse, StoredUser, UserRepository,
};
