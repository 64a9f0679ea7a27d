// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Account registration, login, and bearer-token authentication for the
//! course API.
//!
//! ## Auth Flow
//!
//! 1. Client registers with `POST /api/user/register` (password stored as argon2id)
//! 2. Client logs in with `POST /api/user/login` and receives `JWT <token>`
//! 3. Client sends `Authorization: JWT <token>` (or `Bearer <token>`) on course routes
//! 4. Server:
//!    - Verifies the HS256 signature with `TOKEN_SECRET`
//!    - Resolves `sub` to the stored account, so role changes and deleted
//!      accounts take effect immediately
//!
//! ## Security
//!
//! - All `/api/courses` endpoints require authentication
//! - Tokens carry no expiry and there is no revocation list; rotating
//!   `TOKEN_SECRET` invalidates every outstanding token

pub mod authenticator;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod roles;
pub mod tokens;

pub use authenticator::{AccountError, Authenticator, Session};
pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::require_auth;
pub use roles::Role;
pub use tokens::{TokenKeys, TOKEN_SCHEME};
