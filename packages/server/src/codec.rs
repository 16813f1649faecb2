//! Conversion between domain entities and stored items.

use chrono::{DateTime, Utc};
use common::storage::{
    AttributeValue, GSI1_PK, GSI1_SK, GSI2_PK, GSI2_SK, Item, PK, PrimaryKey, SK,
};
use thiserror::Error;
use uuid::Uuid;

use crate::entity::{Blog, Comment, EntityKind, EntityRef, User};
use crate::keys::{self, IndexKey};

/// Attribute names.
pub mod attr {
    pub const ENTITY_TYPE: &str = "entity_type";
    pub const USER_ID: &str = "user_id";
    pub const BLOG_ID: &str = "blog_id";
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const TITLE: &str = "title";
    pub const SCORE: &str = "score";
    pub const MESSAGE: &str = "message";
    pub const CREATED_DATE: &str = "created_date";
}

/// A stored item could not be turned back into an entity.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("missing attribute `{0}`")]
    Missing(&'static str),

    #[error("attribute `{name}` has type {found}, expected {expected}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("attribute `{name}` is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("unknown entity type `{0}`")]
    UnknownType(String),

    #[error("expected a {expected} item, found {found}")]
    WrongEntity {
        expected: EntityKind,
        found: EntityKind,
    },
}

/// An entity stored in the shared table.
pub trait Entity: Sized {
    const KIND: EntityKind;

    /// Primary key of this entity.
    fn key(&self) -> PrimaryKey;

    fn entity_ref(&self) -> EntityRef;

    /// Full item, including primary and index keys.
    fn encode(&self) -> Item;

    /// Rebuild the entity from its data attributes. Key attributes are not read,
    /// since they are derived from the data.
    fn decode(item: &Item) -> Result<Self, DecodeError>;
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn key(&self) -> PrimaryKey {
        keys::user_key(self.id)
    }

    fn entity_ref(&self) -> EntityRef {
        EntityRef::User { id: self.id }
    }

    fn encode(&self) -> Item {
        let mut item = base_item(Self::KIND, self.key());
        put_index(
            &mut item,
            GSI2_PK,
            GSI2_SK,
            keys::user_type_index_key(self.id),
        );
        item.insert(attr::USER_ID.into(), self.id.to_string().into());
        item.insert(attr::NAME.into(), self.name.as_str().into());
        item.insert(attr::EMAIL.into(), self.email.as_str().into());
        item.insert(attr::PASSWORD.into(), self.password.as_str().into());
        item
    }

    fn decode(item: &Item) -> Result<Self, DecodeError> {
        expect_kind(item, Self::KIND)?;
        Ok(Self {
            id: uuid(item, attr::USER_ID)?,
            name: string(item, attr::NAME)?,
            email: string(item, attr::EMAIL)?,
            password: string(item, attr::PASSWORD)?,
        })
    }
}

impl Entity for Blog {
    const KIND: EntityKind = EntityKind::Blog;

    fn key(&self) -> PrimaryKey {
        keys::blog_key(self.id)
    }

    fn entity_ref(&self) -> EntityRef {
        EntityRef::Blog { id: self.id }
    }

    fn encode(&self) -> Item {
        let mut item = base_item(Self::KIND, self.key());
        put_index(
            &mut item,
            GSI1_PK,
            GSI1_SK,
            keys::user_blogs_index_key(self.user_id, self.id),
        );
        put_index(
            &mut item,
            GSI2_PK,
            GSI2_SK,
            keys::blog_type_index_key(self.id, &self.created_date),
        );
        item.insert(attr::BLOG_ID.into(), self.id.to_string().into());
        item.insert(attr::USER_ID.into(), self.user_id.to_string().into());
        item.insert(attr::TITLE.into(), self.title.as_str().into());
        item.insert(attr::SCORE.into(), self.score.into());
        item.insert(
            attr::CREATED_DATE.into(),
            keys::format_timestamp(&self.created_date).into(),
        );
        item
    }

    fn decode(item: &Item) -> Result<Self, DecodeError> {
        expect_kind(item, Self::KIND)?;
        Ok(Self {
            id: uuid(item, attr::BLOG_ID)?,
            user_id: uuid(item, attr::USER_ID)?,
            title: string(item, attr::TITLE)?,
            score: number(item, attr::SCORE)?,
            created_date: timestamp(item, attr::CREATED_DATE)?,
        })
    }
}

impl Entity for Comment {
    const KIND: EntityKind = EntityKind::Comment;

    fn key(&self) -> PrimaryKey {
        keys::comment_key(self.blog_id, self.user_id)
    }

    fn entity_ref(&self) -> EntityRef {
        EntityRef::Comment {
            blog_id: self.blog_id,
            user_id: self.user_id,
        }
    }

    fn encode(&self) -> Item {
        let mut item = base_item(Self::KIND, self.key());
        put_index(
            &mut item,
            GSI1_PK,
            GSI1_SK,
            keys::user_comments_index_key(self.user_id, self.blog_id),
        );
        put_index(
            &mut item,
            GSI2_PK,
            GSI2_SK,
            keys::comment_type_index_key(self.blog_id, self.user_id, &self.created_date),
        );
        item.insert(attr::BLOG_ID.into(), self.blog_id.to_string().into());
        item.insert(attr::USER_ID.into(), self.user_id.to_string().into());
        item.insert(attr::MESSAGE.into(), self.message.as_str().into());
        item.insert(
            attr::CREATED_DATE.into(),
            keys::format_timestamp(&self.created_date).into(),
        );
        item
    }

    fn decode(item: &Item) -> Result<Self, DecodeError> {
        expect_kind(item, Self::KIND)?;
        Ok(Self {
            blog_id: uuid(item, attr::BLOG_ID)?,
            user_id: uuid(item, attr::USER_ID)?,
            message: string(item, attr::MESSAGE)?,
            created_date: timestamp(item, attr::CREATED_DATE)?,
        })
    }
}

/// Any entity, dispatched on the `entity_type` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyEntity {
    User(User),
    Blog(Blog),
    Comment(Comment),
}

impl AnyEntity {
    pub fn decode(item: &Item) -> Result<Self, DecodeError> {
        match entity_kind(item)? {
            EntityKind::User => User::decode(item).map(Self::User),
            EntityKind::Blog => Blog::decode(item).map(Self::Blog),
            EntityKind::Comment => Comment::decode(item).map(Self::Comment),
        }
    }

    pub fn encode(&self) -> Item {
        match self {
            Self::User(u) => u.encode(),
            Self::Blog(b) => b.encode(),
            Self::Comment(c) => c.encode(),
        }
    }

    pub fn entity_ref(&self) -> EntityRef {
        match self {
            Self::User(u) => u.entity_ref(),
            Self::Blog(b) => b.entity_ref(),
            Self::Comment(c) => c.entity_ref(),
        }
    }
}

/// Primary key and identity of a stored item, read from its key, type and id
/// attributes only. The remaining data attributes are not inspected, so an item
/// too damaged to decode can still be located and removed.
pub fn decode_ref(item: &Item) -> Result<(PrimaryKey, EntityRef), DecodeError> {
    let key = PrimaryKey::of(item).ok_or(DecodeError::Missing(PK))?;
    let entity = match entity_kind(item)? {
        EntityKind::User => EntityRef::User {
            id: uuid(item, attr::USER_ID)?,
        },
        EntityKind::Blog => EntityRef::Blog {
            id: uuid(item, attr::BLOG_ID)?,
        },
        EntityKind::Comment => EntityRef::Comment {
            blog_id: uuid(item, attr::BLOG_ID)?,
            user_id: uuid(item, attr::USER_ID)?,
        },
    };
    Ok((key, entity))
}

fn base_item(kind: EntityKind, key: PrimaryKey) -> Item {
    let mut item = Item::new();
    item.insert(PK.into(), key.pk.into());
    item.insert(SK.into(), key.sk.into());
    item.insert(attr::ENTITY_TYPE.into(), kind.as_str().into());
    item
}

fn put_index(item: &mut Item, pk_attr: &str, sk_attr: &str, key: IndexKey) {
    item.insert(pk_attr.into(), key.pk.into());
    item.insert(sk_attr.into(), key.sk.into());
}

fn entity_kind(item: &Item) -> Result<EntityKind, DecodeError> {
    let raw = str_attr(item, attr::ENTITY_TYPE)?;
    EntityKind::parse(raw).ok_or_else(|| DecodeError::UnknownType(raw.to_string()))
}

fn expect_kind(item: &Item, expected: EntityKind) -> Result<(), DecodeError> {
    let found = entity_kind(item)?;
    if found != expected {
        return Err(DecodeError::WrongEntity { expected, found });
    }
    Ok(())
}

fn value<'a>(item: &'a Item, name: &'static str) -> Result<&'a AttributeValue, DecodeError> {
    item.get(name).ok_or(DecodeError::Missing(name))
}

fn str_attr<'a>(item: &'a Item, name: &'static str) -> Result<&'a str, DecodeError> {
    let v = value(item, name)?;
    v.as_s().ok_or(DecodeError::WrongType {
        name,
        expected: "S",
        found: v.type_name(),
    })
}

fn string(item: &Item, name: &'static str) -> Result<String, DecodeError> {
    str_attr(item, name).map(str::to_string)
}

fn uuid(item: &Item, name: &'static str) -> Result<Uuid, DecodeError> {
    let raw = str_attr(item, name)?;
    Uuid::parse_str(raw).map_err(|e| DecodeError::Invalid {
        name,
        reason: e.to_string(),
    })
}

fn number(item: &Item, name: &'static str) -> Result<f64, DecodeError> {
    let v = value(item, name)?;
    let raw = v.as_n().ok_or(DecodeError::WrongType {
        name,
        expected: "N",
        found: v.type_name(),
    })?;
    let n: f64 = raw.parse().map_err(|_| DecodeError::Invalid {
        name,
        reason: format!("`{raw}` is not a number"),
    })?;
    if !n.is_finite() {
        return Err(DecodeError::Invalid {
            name,
            reason: format!("`{raw}` is not finite"),
        });
    }
    Ok(n)
}

fn timestamp(item: &Item, name: &'static str) -> Result<DateTime<Utc>, DecodeError> {
    let raw = str_attr(item, name)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DecodeError::Invalid {
            name,
            reason: e.to_string(),
        })
}
