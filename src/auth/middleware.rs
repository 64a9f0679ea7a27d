// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied with `route_layer` to the course routes, so every course handler
//! runs only after the caller's token has been resolved to a live account.
//! Unauthenticated requests are answered with 401 before any course logic.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::extractor::bearer_token;
use crate::state::AppState;

/// Resolve the bearer token and attach the `AuthenticatedUser` to the request.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let resolved = bearer_token(request.headers())
        .and_then(|token| state.authenticator().authenticate(token));

    match resolved {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            warn!(
                path = %request.uri().path(),
                error_code = e.error_code(),
                "Rejected unauthenticated request"
            );
            e.into_response()
        }
    }
}
