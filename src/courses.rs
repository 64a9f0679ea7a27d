// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Course Lifecycle
//!
//! Create, read, update, delete, enroll and drop, with the authorization
//! policy evaluated against the stored course inside the same write
//! transaction that applies the change.

use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::models::{CourseListing, CoursePatch, CourseRequest, InstructorSummary};
use crate::policy::{authorize, can_create, CourseAction, PolicyError};
use crate::storage::{
    CourseDatabase, CourseFilter, CourseRepository, StoreError, StoredCourse, UserRepository,
};
use crate::validation::{validate_course, validate_course_request, validate_patch, ValidationError};

/// Failure of a course operation.
#[derive(Debug, Error)]
pub enum CourseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Course not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CourseError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => CourseError::NotFound(what),
            other => CourseError::Store(other),
        }
    }
}

/// Result of an enroll call. Enrolling twice is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    Enrolled,
    AlreadyEnrolled,
}

pub struct CourseManager<'a> {
    db: &'a CourseDatabase,
}

impl<'a> CourseManager<'a> {
    pub fn new(db: &'a CourseDatabase) -> Self {
        Self { db }
    }

    fn repo(&self) -> CourseRepository<'a> {
        CourseRepository::new(self.db)
    }

    /// Publish a new course owned by the caller, with an empty roster.
    pub fn create(
        &self,
        caller: &AuthenticatedUser,
        request: &CourseRequest,
    ) -> Result<StoredCourse, CourseError> {
        validate_course_request(request)?;
        can_create(caller)?;

        let course = StoredCourse::new(
            caller.user_id.clone(),
            request.title.clone(),
            request.description.clone(),
            request.price,
        );
        self.repo().create(&course)?;

        info!(course_id = %course.id, instructor = %caller.user_id, "Course created");
        Ok(course)
    }

    pub fn list_courses(&self) -> Result<Vec<CourseListing>, CourseError> {
        self.listing(CourseFilter::All)
    }

    pub fn find_by_instructor(&self, instructor_id: &str) -> Result<Vec<CourseListing>, CourseError> {
        self.listing(CourseFilter::Instructor(instructor_id))
    }

    pub fn find_by_student(&self, student_id: &str) -> Result<Vec<CourseListing>, CourseError> {
        self.listing(CourseFilter::Student(student_id))
    }

    /// Exact title match.
    pub fn find_by_title(&self, title: &str) -> Result<Vec<CourseListing>, CourseError> {
        self.listing(CourseFilter::Title(title))
    }

    pub fn find_by_id(&self, course_id: &str) -> Result<CourseListing, CourseError> {
        let course = self
            .repo()
            .get(course_id)?
            .ok_or_else(|| CourseError::NotFound(format!("Course {course_id}")))?;
        let mut populated = self.populate(vec![course])?;
        populated
            .pop()
            .ok_or_else(|| CourseError::NotFound(format!("Course {course_id}")))
    }

    /// Apply a patch to the editable fields. Only the course instructor may edit.
    pub fn update(
        &self,
        course_id: &str,
        caller: &AuthenticatedUser,
        patch: &CoursePatch,
    ) -> Result<StoredCourse, CourseError> {
        validate_patch(patch)?;

        let ((), course) = self.repo().modify(course_id, |course| {
            authorize(caller, course, CourseAction::Update)?;
            patch.apply_to(course);
            validate_course(&course.title, &course.description, course.price)?;
            Ok::<_, CourseError>(())
        })?;

        info!(course_id = %course.id, "Course updated");
        Ok(course)
    }

    /// Remove a course and return its last state. Only the course instructor may delete.
    pub fn delete(&self, course_id: &str, caller: &AuthenticatedUser) -> Result<StoredCourse, CourseError> {
        let course = self.repo().delete_if(course_id, |course| {
            authorize(caller, course, CourseAction::Delete).map_err(CourseError::from)
        })?;

        info!(course_id = %course.id, "Course deleted");
        Ok(course)
    }

    /// Add the caller to the roster. Already being enrolled is reported, not rejected.
    pub fn enroll(&self, course_id: &str, caller: &AuthenticatedUser) -> Result<EnrollOutcome, CourseError> {
        let (outcome, _) = self.repo().modify(course_id, |course| {
            match authorize(caller, course, CourseAction::Enroll) {
                Ok(()) => {
                    course.add_student(&caller.user_id);
                    Ok(EnrollOutcome::Enrolled)
                }
                Err(PolicyError::AlreadyEnrolled) => Ok(EnrollOutcome::AlreadyEnrolled),
                Err(other) => Err(CourseError::from(other)),
            }
        })?;

        info!(course_id, user_id = %caller.user_id, ?outcome, "Enrollment processed");
        Ok(outcome)
    }

    /// Remove the caller from the roster. Only current members may drop.
    pub fn drop_out(&self, course_id: &str, caller: &AuthenticatedUser) -> Result<StoredCourse, CourseError> {
        let ((), course) = self.repo().modify(course_id, |course| {
            authorize(caller, course, CourseAction::Drop)?;
            course.remove_student(&caller.user_id);
            Ok::<_, CourseError>(())
        })?;

        info!(course_id, user_id = %caller.user_id, "Student dropped course");
        Ok(course)
    }

    fn listing(&self, filter: CourseFilter<'_>) -> Result<Vec<CourseListing>, CourseError> {
        let courses = self.repo().list(filter)?;
        self.populate(courses)
    }

    /// Resolve each course's instructor into `{_id, username, email}`.
    fn populate(&self, courses: Vec<StoredCourse>) -> Result<Vec<CourseListing>, CourseError> {
        let users = UserRepository::new(self.db);
        let mut instructors: HashMap<String, Option<InstructorSummary>> = HashMap::new();

        let mut listings = Vec::with_capacity(courses.len());
        for course in courses {
            let instructor = match instructors.get(&course.instructor) {
                Some(cached) => cached.clone(),
                None => {
                    let summary = users.get(&course.instructor)?.map(InstructorSummary::from);
                    instructors.insert(course.instructor.clone(), summary.clone());
                    summary
                }
            };
            listings.push(CourseListing::new(course, instructor));
        }
        Ok(listings)
    }
}
