// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: register and login.

use axum::{extract::State, Json};
use tracing::debug;

use crate::{
    error::{ApiError, ApiJson},
    models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    state::AppState,
};

/// Connectivity probe for the account routes.
#[utoipa::path(
    get,
    path = "/api/user/testAPI",
    tag = "Users",
    responses((status = 200, description = "Account routes are reachable", body = String))
)]
pub async fn test_api() -> &'static str {
    debug!("Account route probe");
    "Connected to the auth routes."
}

/// Register a new student or instructor account.
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterRequest,
    tag = "Users",
    responses(
        (status = 200, description = "User saved", body = RegisterResponse),
        (status = 400, description = "Invalid input or email already registered"),
        (status = 500, description = "Datastore failure"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let user = state.authenticator().register(&request)?;
    Ok(Json(RegisterResponse {
        msg: "User saved.".to_string(),
        saved_user: user.into(),
    }))
}

/// Log in and receive a `JWT <token>` for the course routes.
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    tag = "Users",
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unknown email or wrong password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = state.authenticator().login(&request)?;
    Ok(Json(LoginResponse {
        msg: "Logged in.".to_string(),
        token: session.token,
        user: session.user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            username: "erin".into(),
            password: "hunter22".into(),
            role: "student".into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let (state, _dir) = AppState::temporary();

        let Json(saved) = register(State(state.clone()), ApiJson(registration("erin@example.com")))
            .await
            .expect("registration succeeds");
        assert_eq!(saved.saved_user.email, "erin@example.com");

        let Json(session) = login(
            State(state),
            ApiJson(LoginRequest {
                email: "erin@example.com".into(),
                password: "hunter22".into(),
            }),
        )
        .await
        .expect("login succeeds");
        assert!(session.token.starts_with("JWT "));
        assert_eq!(session.user.id, saved.saved_user.id);
    }

    #[tokio::test]
    async fn duplicate_registration_is_400() {
        let (state, _dir) = AppState::temporary();
        register(State(state.clone()), ApiJson(registration("erin@example.com")))
            .await
            .unwrap();

        let err = register(State(state), ApiJson(registration("erin@example.com")))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_email_is_401() {
        let (state, _dir) = AppState::temporary();
        let err = login(
            State(state),
            ApiJson(LoginRequest {
                email: "nobody@example.com".into(),
                password: "hunter22".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
