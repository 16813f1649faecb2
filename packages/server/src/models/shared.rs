use serde::Serialize;
use uuid::Uuid;

use crate::entity::EntityRef;
use crate::repository::RepoError;

/// Response for delete endpoints: every record removed, children first.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: Vec<EntityRef>,
}

/// Parse a UUID from a path segment or query parameter.
pub fn parse_id(value: &str, name: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| RepoError::Validation(format!("{name} must be a UUID")))
}

/// Parse an optional UUID query parameter. Blank values count as absent.
pub fn parse_optional_id(value: Option<&str>, name: &str) -> Result<Option<Uuid>, RepoError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_id(v, name).map(Some),
    }
}

/// Validate that the trimmed value has between `min` and `max` characters.
pub fn validate_length(value: &str, field: &str, min: usize, max: usize) -> Result<(), RepoError> {
    let count = value.trim().chars().count();
    if count < min || count > max {
        return Err(RepoError::Validation(format!(
            "{field} must be {min}-{max} characters"
        )));
    }
    Ok(())
}

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), RepoError> {
    validate_length(title, "Title", 1, 256)
}

/// Normalize an optional equality filter: trimmed, blank means no filter.
pub fn filter_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
