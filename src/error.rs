// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP error type and the mapping from domain errors to status codes.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::auth::AccountError;
use crate::courses::CourseError;
use crate::policy::PolicyError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// 500 with a fixed message. The cause is logged, never returned.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "Internal error while handling request");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<PolicyError> for ApiError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::InstructorRequired => ApiError::bad_request(err.to_string()),
            PolicyError::NotOwner(_) | PolicyError::NotEnrolled => ApiError::forbidden(err.to_string()),
            PolicyError::AlreadyEnrolled => ApiError::conflict(err.to_string()),
        }
    }
}

impl From<CourseError> for ApiError {
    fn from(err: CourseError) -> Self {
        match err {
            CourseError::Validation(e) => ApiError::bad_request(e.to_string()),
            // Existing clients expect 400 for an unknown course id
            CourseError::NotFound(_) => ApiError::bad_request("Course not found."),
            CourseError::Policy(e) => e.into(),
            CourseError::Store(e) => ApiError::internal(e),
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(_) | AccountError::EmailTaken => {
                ApiError::bad_request(err.to_string())
            }
            AccountError::UnknownEmail | AccountError::WrongPassword => {
                ApiError::unauthorized(err.to_string())
            }
            AccountError::Password(_) | AccountError::Token(_) | AccountError::Store(_) => {
                ApiError::internal(err)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// JSON body extractor whose rejections render as `ApiError` (400).
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}
