// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::Role;
use crate::storage::StoredUser;

/// Claims carried by a session token.
///
/// Tokens carry no expiry; a token stays valid for as long as the signing
/// secret is unchanged and its subject exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email at the time of issue
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
}

/// Authenticated user information.
///
/// This is the primary type used throughout the application to represent
/// the caller. It is rebuilt from the user store on every request, so the
/// role is always current.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User ID (token `sub` claim)
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub role: Role,
}

impl From<StoredUser> for AuthenticatedUser {
    fn from(user: StoredUser) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            username: user.username,
            role: user.role,
        }
    }
}
