// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-shape validation.
//!
//! Length limits are counted in characters, not bytes.

use thiserror::Error;

use crate::auth::Role;
use crate::models::{CoursePatch, CourseRequest, LoginRequest, RegisterRequest};

pub const USERNAME_LEN: (usize, usize) = (3, 50);
pub const EMAIL_LEN: (usize, usize) = (6, 50);
pub const PASSWORD_LEN: (usize, usize) = (6, 255);
pub const TITLE_LEN: (usize, usize) = (6, 50);
pub const DESCRIPTION_LEN: (usize, usize) = (6, 50);
pub const PRICE_RANGE: (f64, f64) = (10.0, 9999.0);

/// Malformed request input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

fn check_length(field: &str, value: &str, (min, max): (usize, usize)) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ValidationError(format!("\"{field}\" is not allowed to be empty")));
    }
    if len < min {
        return Err(ValidationError(format!(
            "\"{field}\" length must be at least {min} characters long"
        )));
    }
    if len > max {
        return Err(ValidationError(format!(
            "\"{field}\" length must be less than or equal to {max} characters long"
        )));
    }
    Ok(())
}

fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    check_length("email", email, EMAIL_LEN)?;
    if !is_email_shaped(email) {
        return Err(ValidationError("\"email\" must be a valid email".to_string()));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), ValidationError> {
    let (min, max) = PRICE_RANGE;
    if !price.is_finite() {
        return Err(ValidationError("\"price\" must be a number".to_string()));
    }
    if price < min {
        return Err(ValidationError(format!(
            "\"price\" must be greater than or equal to {min}"
        )));
    }
    if price > max {
        return Err(ValidationError(format!(
            "\"price\" must be less than or equal to {max}"
        )));
    }
    Ok(())
}

/// Validate a registration request and return the parsed role.
pub fn validate_registration(request: &RegisterRequest) -> Result<Role, ValidationError> {
    check_length("username", &request.username, USERNAME_LEN)?;
    check_email(request.email.trim())?;
    check_length("password", &request.password, PASSWORD_LEN)?;
    Role::parse(&request.role).ok_or_else(|| {
        ValidationError("\"role\" must be one of [student, instructor]".to_string())
    })
}

pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationError> {
    check_email(request.email.trim())?;
    check_length("password", &request.password, PASSWORD_LEN)
}

/// Validate the fields of a course.
pub fn validate_course(title: &str, description: &str, price: f64) -> Result<(), ValidationError> {
    check_length("title", title, TITLE_LEN)?;
    check_length("description", description, DESCRIPTION_LEN)?;
    check_price(price)
}

pub fn validate_course_request(request: &CourseRequest) -> Result<(), ValidationError> {
    validate_course(&request.title, &request.description, request.price)
}

/// Validate the fields present in a patch. An empty patch is rejected.
pub fn validate_patch(patch: &CoursePatch) -> Result<(), ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError(
            "at least one of \"title\", \"description\" or \"price\" is required".to_string(),
        ));
    }
    if let Some(title) = &patch.title {
        check_length("title", title, TITLE_LEN)?;
    }
    if let Some(description) = &patch.description {
        check_length("description", description, DESCRIPTION_LEN)?;
    }
    if let Some(price) = patch.price {
        check_price(price)?;
    }
    Ok(())
}
