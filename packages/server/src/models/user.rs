use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::User;
use crate::repository::RepoError;

use super::shared::{filter_value, validate_length};

/// Request body for creating a user.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    /// Display name (1-64 chars).
    pub name: String,
    pub email: String,
    /// Plain password (8-128 chars); stored hashed.
    pub password: String,
}

#[derive(Deserialize, Default, PartialEq)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

#[derive(Serialize)]
pub struct UserListResponse {
    pub data: Vec<UserResponse>,
}

/// Equality filters for listing users.
#[derive(Deserialize, Default, Debug)]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserFilter {
    pub fn normalized(self) -> Self {
        Self {
            name: filter_value(self.name),
            email: filter_value(self.email),
        }
    }
}

pub fn validate_name(name: &str) -> Result<(), RepoError> {
    validate_length(name, "Name", 1, 64)
}

pub fn validate_email(email: &str) -> Result<(), RepoError> {
    let email = email.trim();
    validate_length(email, "Email", 3, 254)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) {
        return Err(RepoError::Validation("Email address is malformed".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), RepoError> {
    let count = password.chars().count();
    if !(8..=128).contains(&count) {
        return Err(RepoError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_user(payload: &CreateUserRequest) -> Result<(), RepoError> {
    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)
}

/// Validate a user after a patch has been applied.
pub fn validate_user(user: &User) -> Result<(), RepoError> {
    validate_name(&user.name)?;
    validate_email(&user.email)
}
