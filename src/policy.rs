// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization policy for course operations.
//!
//! Pure predicates over an immutable snapshot of the caller and the target
//! course. No I/O happens here; callers evaluate these inside the storage
//! transaction that performs the guarded write.
//!
//! | Action | Allowed when |
//! |--------|--------------|
//! | Create | caller is an instructor |
//! | Update | caller is the course instructor |
//! | Delete | caller is the course instructor |
//! | Enroll | caller is not yet on the roster |
//! | Drop   | caller is on the roster |

use thiserror::Error;

use crate::auth::AuthenticatedUser;
use crate::storage::StoredCourse;

/// Trait for resources that have a single owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_user_id(&self) -> &str;
}

/// Trait for checking ownership of a resource.
pub trait OwnershipEnforcer {
    fn is_owned_by(&self, user: &AuthenticatedUser) -> bool;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn is_owned_by(&self, user: &AuthenticatedUser) -> bool {
        self.owner_user_id() == user.user_id
    }
}

/// Transition requested on a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseAction {
    Create,
    Update,
    Delete,
    Enroll,
    Drop,
}

impl std::fmt::Display for CourseAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseAction::Create => write!(f, "create"),
            CourseAction::Update => write!(f, "edit"),
            CourseAction::Delete => write!(f, "delete"),
            CourseAction::Enroll => write!(f, "enroll in"),
            CourseAction::Drop => write!(f, "drop"),
        }
    }
}

/// A policy violation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// Role mismatch: only instructors publish courses
    #[error("Only instructors can publish new courses. If you are an instructor, log in with your instructor account.")]
    InstructorRequired,

    /// Ownership mismatch
    #[error("Only the instructor of this course can {0} it.")]
    NotOwner(CourseAction),

    /// No-op transition: caller is already on the roster
    #[error("Already enrolled in this course.")]
    AlreadyEnrolled,

    /// Caller is not on the roster
    #[error("Only students of this course can drop it.")]
    NotEnrolled,
}

impl PolicyError {
    /// Conflicts describe no-op transitions rather than missing rights.
    pub fn is_conflict(&self) -> bool {
        matches!(self, PolicyError::AlreadyEnrolled)
    }
}

/// Check whether the caller may publish a new course.
pub fn can_create(caller: &AuthenticatedUser) -> Result<(), PolicyError> {
    if caller.role.is_instructor() {
        Ok(())
    } else {
        Err(PolicyError::InstructorRequired)
    }
}

/// Check whether the caller may perform `action` on `course`.
pub fn authorize(
    caller: &AuthenticatedUser,
    course: &StoredCourse,
    action: CourseAction,
) -> Result<(), PolicyError> {
    match action {
        CourseAction::Create => can_create(caller),
        CourseAction::Update | CourseAction::Delete => {
            if course.is_owned_by(caller) {
                Ok(())
            } else {
                Err(PolicyError::NotOwner(action))
            }
        }
        CourseAction::Enroll => {
            if course.has_student(&caller.user_id) {
                Err(PolicyError::AlreadyEnrolled)
            } else {
                Ok(())
            }
        }
        CourseAction::Drop => {
            if course.has_student(&caller.user_id) {
                Ok(())
            } else {
                Err(PolicyError::NotEnrolled)
            }
        }
    }
}
