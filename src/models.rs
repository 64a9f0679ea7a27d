// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies used by the REST API. All types derive
//! `ToSchema` for OpenAPI documentation.
//!
//! Response envelopes keep the field names existing clients rely on
//! (`_id`, `foundCourses`, `savedCourse`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Role;
use crate::storage::{StoredCourse, StoredUser};

// =============================================================================
// User Models
// =============================================================================

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    /// `student` or `instructor`
    pub role: String,
}

/// Request to log in.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<StoredUser> for UserProfile {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub msg: String,
    pub saved_user: UserProfile,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub msg: String,
    /// Token in `JWT <token>` form, sent back verbatim in `Authorization`
    pub token: String,
    pub user: UserProfile,
}

// =============================================================================
// Course Models
// =============================================================================

/// Request to publish a course.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CourseRequest {
    pub title: String,
    pub description: String,
    pub price: f64,
}

/// Partial update of a course's editable fields.
///
/// Unknown fields are rejected, so `instructor` and `students` can never be
/// patched through this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CoursePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.price.is_none()
    }

    /// Copy the present fields onto `course`.
    pub fn apply_to(&self, course: &mut StoredCourse) {
        if let Some(title) = &self.title {
            course.title = title.clone();
        }
        if let Some(description) = &self.description {
            course.description = description.clone();
        }
        if let Some(price) = self.price {
            course.price = price;
        }
    }
}

/// Instructor as shown inside course listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct InstructorSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<StoredUser> for InstructorSummary {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Course with its instructor resolved, as returned by read endpoints.
///
/// `instructor` is `null` if the owning account no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CourseListing {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub instructor: Option<InstructorSummary>,
    pub students: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CourseListing {
    pub fn new(course: StoredCourse, instructor: Option<InstructorSummary>) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            price: course.price,
            instructor,
            students: course.students,
            created_at: course.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseListResponse {
    pub message: String,
    pub found_courses: Vec<CourseListing>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseFoundResponse {
    pub message: String,
    pub found_course: CourseListing,
}

/// Title search result. The key is singular even though it holds a list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSearchResponse {
    pub message: String,
    pub found_course: Vec<CourseListing>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSavedResponse {
    pub message: String,
    pub saved_course: StoredCourse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdatedResponse {
    pub message: String,
    pub updated_course: StoredCourse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDeletedResponse {
    pub message: String,
    pub course_deleted: StoredCourse,
}

/// Outcome marker for enrollment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnrollResult {
    /// Caller was added to the roster
    Success,
    /// Caller was already on the roster; nothing changed
    Failed,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EnrollResponse {
    pub result: EnrollResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_profile_hides_password_hash() {
        let user = StoredUser::new("alice@example.com", "alice", "$argon2id$secret", Role::Student);
        let json = serde_json::to_value(UserProfile::from(user.clone())).unwrap();

        assert_eq!(json["_id"], user.id);
        assert_eq!(json["role"], "student");
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("secret"));
    }

    #[test]
    fn envelopes_use_camel_case_keys() {
        let course = StoredCourse::new("inst", "Rust 101", "Ownership and borrowing", 100.0);
        let json = serde_json::to_value(CourseSavedResponse {
            message: "saved".into(),
            saved_course: course.clone(),
        })
        .unwrap();
        assert_eq!(json["savedCourse"]["_id"], course.id);
        assert_eq!(json["savedCourse"]["instructor"], "inst");

        let json = serde_json::to_value(EnrollResponse {
            result: EnrollResult::Failed,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "result": "failed" }));
    }

    #[test]
    fn patch_rejects_protected_fields() {
        let err = serde_json::from_str::<CoursePatch>(r#"{"instructor":"me"}"#);
        assert!(err.is_err());

        let patch: CoursePatch = serde_json::from_str(r#"{"price":42}"#).unwrap();
        let mut course = StoredCourse::new("inst", "Rust 101", "Ownership and borrowing", 100.0);
        patch.apply_to(&mut course);
        assert_eq!(course.price, 42.0);
        assert_eq!(course.title, "Rust 101");
    }
}
