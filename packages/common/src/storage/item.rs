use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Partition key attribute of the primary index.
pub const PK: &str = "PK";
/// Sort key attribute of the primary index.
pub const SK: &str = "SK";
/// Partition key attribute of the first global secondary index.
pub const GSI1_PK: &str = "GSI1PK";
/// Sort key attribute of the first global secondary index.
pub const GSI1_SK: &str = "GSI1SK";
/// Partition key attribute of the second global secondary index.
pub const GSI2_PK: &str = "GSI2PK";
/// Sort key attribute of the second global secondary index.
pub const GSI2_SK: &str = "GSI2SK";

/// A single attribute value.
///
/// Serializes in the DynamoDB JSON shape (`{"S": "..."}`, `{"N": "1.5"}`), so
/// seed files and snapshots can be written by hand or exported from other tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// UTF-8 string.
    S(String),
    /// Number, kept in its decimal string form.
    N(String),
    /// Boolean.
    #[serde(rename = "BOOL")]
    Bool(bool),
    /// Explicit null.
    #[serde(rename = "NULL")]
    Null(bool),
}

impl AttributeValue {
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short type tag used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::Bool(_) => "BOOL",
            Self::Null(_) => "NULL",
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::S(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::S(s.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        Self::N(n.to_string())
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A stored item: attribute name to value.
pub type Item = BTreeMap<String, AttributeValue>;

/// Primary identity of an item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub pk: String,
    pub sk: String,
}

impl PrimaryKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }

    /// Extract the primary key from an item.
    ///
    /// Returns `None` if either key attribute is missing or not a string.
    pub fn of(item: &Item) -> Option<Self> {
        let pk = item.get(PK)?.as_s()?;
        let sk = item.get(SK)?.as_s()?;
        Some(Self::new(pk, sk))
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.pk, self.sk)
    }
}

/// Index a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    /// The table itself, keyed by `PK`/`SK`.
    Primary,
    /// Global secondary index keyed by `GSI1PK`/`GSI1SK`.
    Gsi1,
    /// Global secondary index keyed by `GSI2PK`/`GSI2SK`.
    Gsi2,
}

impl Index {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primary => "table",
            Self::Gsi1 => "GSI1",
            Self::Gsi2 => "GSI2",
        }
    }

    /// Partition and sort key attribute names for this index.
    pub fn key_attributes(&self) -> (&'static str, &'static str) {
        match self {
            Self::Primary => (PK, SK),
            Self::Gsi1 => (GSI1_PK, GSI1_SK),
            Self::Gsi2 => (GSI2_PK, GSI2_SK),
        }
    }

    /// Indexes that are maintained alongside the table.
    pub fn secondary() -> [Index; 2] {
        [Self::Gsi1, Self::Gsi2]
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Precondition attached to a put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PutCondition {
    /// Unconditional overwrite.
    #[default]
    None,
    /// Fail if an item with the same primary key exists.
    NotExists,
    /// Fail unless an item with the same primary key exists.
    Exists,
}

/// A key-condition query against one index, with optional equality filters.
///
/// Filters are applied to matching items before they are returned; they never
/// widen the set of items read.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub index: Index,
    pub partition: String,
    pub sort_prefix: Option<String>,
    pub filters: Vec<(String, AttributeValue)>,
}

impl Query {
    pub fn new(index: Index, partition: impl Into<String>) -> Self {
        Self {
            index,
            partition: partition.into(),
            sort_prefix: None,
            filters: Vec::new(),
        }
    }

    /// Restrict to sort keys starting with `prefix`.
    pub fn sort_begins_with(mut self, prefix: impl Into<String>) -> Self {
        self.sort_prefix = Some(prefix.into());
        self
    }

    /// Keep only items whose `attribute` equals `value`.
    pub fn filter_eq(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.filters.push((attribute.into(), value.into()));
        self
    }

    /// Whether `item` passes every filter.
    pub fn matches(&self, item: &Item) -> bool {
        self.filters
            .iter()
            .all(|(attr, value)| item.get(attr) == Some(value))
    }
}
