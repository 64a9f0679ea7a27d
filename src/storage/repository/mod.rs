// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the database.

pub mod courses;
pub mod users;

pub use courses::{CourseFilter, CourseRepository, StoredCourse};
pub use users::{normalize_email, StoredUser, UserRepository};
