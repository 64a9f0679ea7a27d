// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Authorization schemes accepted in front of a token.
const ACCEPTED_SCHEMES: [&str; 2] = ["JWT ", "Bearer "];

/// Extractor for authenticated users.
///
/// Uses the user attached by the `require_auth` middleware when present,
/// otherwise resolves the `Authorization` header itself.
///
/// # Example
///
/// ```rust,ignore
/// async fn create_course(
///     Auth(user): Auth,
///     State(state): State<AppState>,
/// ) -> Result<Json<CourseSavedResponse>, ApiError> {
///     // user.user_id is the caller, user.role their current role
/// }
/// ```
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let token = bearer_token(&parts.headers)?;
        let user = state.authenticator().authenticate(token)?;
        Ok(Auth(user))
    }
}

/// Pull the bare token out of `Authorization: JWT <token>` or
/// `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = ACCEPTED_SCHEMES
        .iter()
        .find_map(|scheme| auth_header.strip_prefix(scheme))
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}
