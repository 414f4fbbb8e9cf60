mod collection;
mod substrate;

pub use collection::{Coll, MongoCollection, StateEntry};
pub use substrate::MongoSubstrate;
