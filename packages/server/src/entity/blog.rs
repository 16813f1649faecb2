use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A blog post owned by one user.
#[derive(Clone, Debug, PartialEq)]
pub struct Blog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub score: f64,
    pub created_date: DateTime<Utc>,
}
