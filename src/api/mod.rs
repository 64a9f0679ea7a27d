// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_auth, Role},
    models::{
        CourseDeletedResponse, CourseFoundResponse, CourseListResponse, CourseListing,
        CoursePatch, CourseRequest, CourseSavedResponse, CourseSearchResponse,
        CourseUpdatedResponse, EnrollResponse, EnrollResult, InstructorSummary, LoginRequest,
        LoginResponse, RegisterRequest, RegisterResponse, UserProfile,
    },
    state::AppState,
    storage::StoredCourse,
};

pub mod courses;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/api/user/testAPI", get(users::test_api))
        .route("/api/user/register", post(users::register))
        .route("/api/user/login", post(users::login));

    let course_routes = Router::new()
        .route(
            "/api/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/api/courses/",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/api/courses/instructor/{instructor_id}",
            get(courses::courses_by_instructor),
        )
        .route(
            "/api/courses/student/{student_id}",
            get(courses::courses_by_student),
        )
        .route("/api/courses/findbyname/{name}", get(courses::find_by_name))
        .route("/api/courses/enroll/{course_id}", post(courses::enroll))
        .route("/api/courses/dropOut/{course_id}", patch(courses::drop_out))
        .route(
            "/api/courses/{course_id}",
            get(courses::get_course)
                .patch(courses::update_course)
                .delete(courses::delete_course),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    Router::new()
        .merge(user_routes)
        .merge(course_routes)
        .merge(health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the `JWT <token>` bearer scheme used by the course routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token from POST /api/user/login, sent as `JWT <token>` or `Bearer <token>`.",
                    ))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        users::test_api,
        users::register,
        users::login,
        courses::list_courses,
        courses::courses_by_instructor,
        courses::courses_by_student,
        courses::get_course,
        courses::find_by_name,
        courses::create_course,
        courses::enroll,
        courses::update_course,
        courses::drop_out,
        courses::delete_course,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Role,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            UserProfile,
            StoredCourse,
            CourseRequest,
            CoursePatch,
            CourseListing,
            InstructorSummary,
            CourseListResponse,
            CourseFoundResponse,
            CourseSearchResponse,
            CourseSavedResponse,
            CourseUpdatedResponse,
            CourseDeletedResponse,
            EnrollResponse,
            EnrollResult,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Users", description = "Registration and login"),
        (name = "Courses", description = "Course publishing and enrollment"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
