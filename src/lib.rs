// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Course Enrollment Server
//!
//! REST backend where instructors publish courses and students enroll in
//! and drop them, with bearer-token authentication.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Registration, login, and token authentication
//! - `courses` - Course lifecycle (create, edit, delete, enroll, drop)
//! - `policy` - Role and ownership rules for course operations
//! - `storage` - Embedded ACID datastore (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod courses;
pub mod error;
pub mod models;
pub mod policy;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod validation;
