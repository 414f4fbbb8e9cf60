use std::ops::Deref;

use mongodb::{
    bson::{doc, spec::BinarySubtype, Binary},
    sync::{Collection, Database},
};
use serde::{Deserialize, Serialize};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
#[derive(Clone)]
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// One key of the world state and the bytes stored under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    #[serde(rename = "_id")]
    pub key: String,
    pub value: Binary,
}

impl StateEntry {
    pub fn new(key: &str, value: &[u8]) -> Self {
        Self {
            key: key.to_string(),
            value: Binary {
                subtype: BinarySubtype::Generic,
                bytes: value.to_vec(),
            },
        }
    }

    /// Filter matching the entry for `key`.
    pub fn filter(key: &str) -> mongodb::bson::Document {
        doc! { "_id": key }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.value.bytes
    }
}

const STATE: &str = "state";
impl MongoCollection for StateEntry {
    const NAME: &'static str = STATE;
}
