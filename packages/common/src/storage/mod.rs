mod error;
mod item;
mod traits;

pub mod memory;

pub use error::StoreError;
pub use item::{
    AttributeValue, GSI1_PK, GSI1_SK, GSI2_PK, GSI2_SK, Index, Item, PK, PrimaryKey, PutCondition,
    Query, SK,
};
pub use memory::MemoryStore;
pub use traits::EntityStore;
