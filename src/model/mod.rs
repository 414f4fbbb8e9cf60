pub mod document;
pub mod election;
pub mod keys;
pub mod mongodb;
pub mod substrate;
pub mod votes;
