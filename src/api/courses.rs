// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Course endpoints. All routes sit behind `require_auth`.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    auth::Auth,
    courses::EnrollOutcome,
    error::{ApiError, ApiJson},
    models::{
        CourseDeletedResponse, CourseFoundResponse, CourseListResponse, CoursePatch, CourseRequest,
        CourseSavedResponse, CourseSearchResponse, CourseUpdatedResponse, EnrollResponse,
        EnrollResult,
    },
    state::AppState,
};

const LISTING_MESSAGE: &str = "Course list";
const FOUND_MESSAGE: &str = "Course found";

#[utoipa::path(
    get,
    path = "/api/courses",
    tag = "Courses",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "All courses", body = CourseListResponse),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<CourseListResponse>, ApiError> {
    Ok(Json(CourseListResponse {
        message: LISTING_MESSAGE.to_string(),
        found_courses: state.courses().list_courses()?,
    }))
}

#[utoipa::path(
    get,
    path = "/api/courses/instructor/{instructor_id}",
    params(("instructor_id" = String, Path, description = "Instructor user ID")),
    tag = "Courses",
    security(("bearer" = [])),
    responses((status = 200, description = "Courses taught by the instructor", body = CourseListResponse))
)]
pub async fn courses_by_instructor(
    State(state): State<AppState>,
    Path(instructor_id): Path<String>,
) -> Result<Json<CourseListResponse>, ApiError> {
    Ok(Json(CourseListResponse {
        message: LISTING_MESSAGE.to_string(),
        found_courses: state.courses().find_by_instructor(&instructor_id)?,
    }))
}

#[utoipa::path(
    get,
    path = "/api/courses/student/{student_id}",
    params(("student_id" = String, Path, description = "Student user ID")),
    tag = "Courses",
    security(("bearer" = [])),
    responses((status = 200, description = "Courses the student is enrolled in", body = CourseListResponse))
)]
pub async fn courses_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<CourseListResponse>, ApiError> {
    Ok(Json(CourseListResponse {
        message: LISTING_MESSAGE.to_string(),
        found_courses: state.courses().find_by_student(&student_id)?,
    }))
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    tag = "Courses",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The course", body = CourseFoundResponse),
        (status = 400, description = "Course not found"),
    )
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseFoundResponse>, ApiError> {
    Ok(Json(CourseFoundResponse {
        message: FOUND_MESSAGE.to_string(),
        found_course: state.courses().find_by_id(&course_id)?,
    }))
}

/// Courses whose title equals `name` exactly.
#[utoipa::path(
    get,
    path = "/api/courses/findbyname/{name}",
    params(("name" = String, Path, description = "Exact course title")),
    tag = "Courses",
    security(("bearer" = [])),
    responses((status = 200, description = "Matching courses", body = CourseSearchResponse))
)]
pub async fn find_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CourseSearchResponse>, ApiError> {
    Ok(Json(CourseSearchResponse {
        message: FOUND_MESSAGE.to_string(),
        found_course: state.courses().find_by_title(&name)?,
    }))
}

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CourseRequest,
    tag = "Courses",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Course saved", body = CourseSavedResponse),
        (status = 400, description = "Invalid input or caller is not an instructor"),
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiJson(request): ApiJson<CourseRequest>,
) -> Result<Json<CourseSavedResponse>, ApiError> {
    let course = state.courses().create(&user, &request)?;
    Ok(Json(CourseSavedResponse {
        message: "New course saved".to_string(),
        saved_course: course,
    }))
}

/// Enroll the caller. An existing enrollment yields `{"result": "failed"}`.
#[utoipa::path(
    post,
    path = "/api/courses/enroll/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    tag = "Courses",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Enrollment outcome", body = EnrollResponse),
        (status = 400, description = "Course not found"),
    )
)]
pub async fn enroll(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(course_id): Path<String>,
) -> Result<Json<EnrollResponse>, ApiError> {
    let result = match state.courses().enroll(&course_id, &user)? {
        EnrollOutcome::Enrolled => EnrollResult::Success,
        EnrollOutcome::AlreadyEnrolled => EnrollResult::Failed,
    };
    Ok(Json(EnrollResponse { result }))
}

#[utoipa::path(
    patch,
    path = "/api/courses/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    request_body = CoursePatch,
    tag = "Courses",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Course updated", body = CourseUpdatedResponse),
        (status = 400, description = "Invalid input or course not found"),
        (status = 403, description = "Caller is not the course instructor"),
    )
)]
pub async fn update_course(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(course_id): Path<String>,
    ApiJson(patch): ApiJson<CoursePatch>,
) -> Result<Json<CourseUpdatedResponse>, ApiError> {
    let course = state.courses().update(&course_id, &user, &patch)?;
    Ok(Json(CourseUpdatedResponse {
        message: "Course updated".to_string(),
        updated_course: course,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/courses/dropOut/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    tag = "Courses",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Caller removed from the roster", body = CourseUpdatedResponse),
        (status = 400, description = "Course not found"),
        (status = 403, description = "Caller is not enrolled"),
    )
)]
pub async fn drop_out(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(course_id): Path<String>,
) -> Result<Json<CourseUpdatedResponse>, ApiError> {
    let course = state.courses().drop_out(&course_id, &user)?;
    Ok(Json(CourseUpdatedResponse {
        message: "Dropped course".to_string(),
        updated_course: course,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{course_id}",
    params(("course_id" = String, Path, description = "Course ID")),
    tag = "Courses",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Course deleted", body = CourseDeletedResponse),
        (status = 400, description = "Course not found"),
        (status = 403, description = "Caller is not the course instructor"),
    )
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Auth(user): Auth,
    Path(course_id): Path<String>,
) -> Result<Json<CourseDeletedResponse>, ApiError> {
    let course = state.courses().delete(&course_id, &user)?;
    Ok(Json(CourseDeletedResponse {
        message: "Course deleted".to_string(),
        course_deleted: course,
    }))
}
