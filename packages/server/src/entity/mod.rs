mod blog;
mod comment;
mod user;

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

pub use blog::Blog;
pub use comment::Comment;
pub use user::User;

/// The kinds of entity sharing the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Blog,
    Comment,
}

impl EntityKind {
    /// Value of the `entity_type` attribute and of the type index partition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Blog => "BLOG",
            Self::Comment => "COMMENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(Self::User),
            "BLOG" => Some(Self::Blog),
            "COMMENT" => Some(Self::Comment),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Blog => "blog",
            Self::Comment => "comment",
        })
    }
}

/// Identity of a single stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityRef {
    User { id: Uuid },
    Blog { id: Uuid },
    Comment { blog_id: Uuid, user_id: Uuid },
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::User { .. } => EntityKind::User,
            Self::Blog { .. } => EntityKind::Blog,
            Self::Comment { .. } => EntityKind::Comment,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { id } => write!(f, "user {id}"),
            Self::Blog { id } => write!(f, "blog {id}"),
            Self::Comment { blog_id, user_id } => {
                write!(f, "comment by user {user_id} on blog {blog_id}")
            }
        }
    }
}
