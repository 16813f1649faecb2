//! Key construction for the single-table layout.
//!
//! | Item    | PK         | SK            | GSI1 (owner)            | GSI2 (type)               |
//! |---------|------------|---------------|-------------------------|---------------------------|
//! | User    | `USER#u`   | `USER#u`      |                         | `USER` / `USER#u`         |
//! | Blog    | `BLOG#b`   | `BLOG#b`      | `USER#u` / `BLOG#b`     | `BLOG` / `<created>#b`    |
//! | Comment | `BLOG#b`   | `COMMENT#u`   | `USER#u` / `COMMENT#b`  | `COMMENT` / `<created>#b#u` |
//!
//! Comments live in their blog's partition, so a blog and its comments are read
//! with one primary-index query. The owner index groups everything a user
//! wrote under `USER#u`.

use chrono::{DateTime, SecondsFormat, Utc};
use common::storage::{Index, PrimaryKey, Query};
use uuid::Uuid;

use crate::entity::EntityKind;

pub const USER_PREFIX: &str = "USER#";
pub const BLOG_PREFIX: &str = "BLOG#";
pub const COMMENT_PREFIX: &str = "COMMENT#";

/// Index grouping blogs and comments by their author.
pub const OWNER_INDEX: Index = Index::Gsi1;
/// Index grouping every item by entity type.
pub const TYPE_INDEX: Index = Index::Gsi2;

/// Partition and sort key of a secondary index entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexKey {
    pub pk: String,
    pub sk: String,
}

pub fn user_partition(user_id: Uuid) -> String {
    format!("{USER_PREFIX}{user_id}")
}

pub fn blog_partition(blog_id: Uuid) -> String {
    format!("{BLOG_PREFIX}{blog_id}")
}

pub fn user_key(user_id: Uuid) -> PrimaryKey {
    let key = user_partition(user_id);
    PrimaryKey::new(key.clone(), key)
}

pub fn blog_key(blog_id: Uuid) -> PrimaryKey {
    let key = blog_partition(blog_id);
    PrimaryKey::new(key.clone(), key)
}

pub fn comment_key(blog_id: Uuid, user_id: Uuid) -> PrimaryKey {
    PrimaryKey::new(
        blog_partition(blog_id),
        format!("{COMMENT_PREFIX}{user_id}"),
    )
}

/// Owner-index entry placing a blog under its author.
pub fn user_blogs_index_key(user_id: Uuid, blog_id: Uuid) -> IndexKey {
    IndexKey {
        pk: user_partition(user_id),
        sk: blog_partition(blog_id),
    }
}

/// Owner-index entry placing a comment under its author.
pub fn user_comments_index_key(user_id: Uuid, blog_id: Uuid) -> IndexKey {
    IndexKey {
        pk: user_partition(user_id),
        sk: format!("{COMMENT_PREFIX}{blog_id}"),
    }
}

pub fn user_type_index_key(user_id: Uuid) -> IndexKey {
    IndexKey {
        pk: EntityKind::User.as_str().to_string(),
        sk: user_partition(user_id),
    }
}

pub fn blog_type_index_key(blog_id: Uuid, created_date: &DateTime<Utc>) -> IndexKey {
    IndexKey {
        pk: EntityKind::Blog.as_str().to_string(),
        sk: format!("{}#{blog_id}", format_timestamp(created_date)),
    }
}

pub fn comment_type_index_key(
    blog_id: Uuid,
    user_id: Uuid,
    created_date: &DateTime<Utc>,
) -> IndexKey {
    IndexKey {
        pk: EntityKind::Comment.as_str().to_string(),
        sk: format!("{}#{blog_id}#{user_id}", format_timestamp(created_date)),
    }
}

/// Fixed-width RFC 3339 with nanoseconds, so string order is time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Blogs written by a user.
pub fn blogs_by_user(user_id: Uuid) -> Query {
    Query::new(OWNER_INDEX, user_partition(user_id)).sort_begins_with(BLOG_PREFIX)
}

/// Comments written by a user, on any blog.
pub fn comments_by_user(user_id: Uuid) -> Query {
    Query::new(OWNER_INDEX, user_partition(user_id)).sort_begins_with(COMMENT_PREFIX)
}

/// Comments on a blog. Excludes the blog item sharing the partition.
pub fn comments_by_blog(blog_id: Uuid) -> Query {
    Query::new(Index::Primary, blog_partition(blog_id)).sort_begins_with(COMMENT_PREFIX)
}

/// Every entity of one kind, via the type index.
pub fn all_of(kind: EntityKind) -> Query {
    Query::new(TYPE_INDEX, kind.as_str())
}
