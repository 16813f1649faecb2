use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user's comment on a blog. Identified by the `(blog_id, user_id)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub blog_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub created_date: DateTime<Utc>,
}
