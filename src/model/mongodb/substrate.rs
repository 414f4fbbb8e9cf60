use log::{debug, info};
use mongodb::{
    bson::doc,
    options::ReplaceOptions,
    sync::{Client, Database},
};

use crate::model::substrate::{StorageError, Substrate};

use super::collection::{Coll, StateEntry};

/// A substrate persisting each key as one document in MongoDB.
///
/// Uses the blocking driver API, so it must not be called from inside an
/// async task; run it on a blocking thread instead.
#[derive(Clone)]
pub struct MongoSubstrate {
    db: Database,
    entries: Coll<StateEntry>,
}

impl MongoSubstrate {
    /// Connect to the server at `db_uri` and check that it responds.
    pub fn connect(db_uri: &str, db_name: &str) -> Result<Self, StorageError> {
        let client = Client::with_uri_str(db_uri)?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }, None)?;
        info!("Connected to database {db_name}");
        Ok(Self::from_db(db))
    }

    pub fn from_db(db: Database) -> Self {
        let entries = Coll::from_db(&db);
        Self { db, entries }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Substrate for MongoSubstrate {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entry = self.entries.find_one(StateEntry::filter(key), None)?;
        Ok(entry.map(StateEntry::into_bytes))
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let upsert = ReplaceOptions::builder().upsert(true).build();
        let result =
            self.entries
                .replace_one(StateEntry::filter(key), StateEntry::new(key, value), upsert)?;
        let action = if result.upserted_id.is_some() {
            "Inserted"
        } else {
            "Replaced"
        };
        debug!("{action} state entry '{key}'");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Connect to a throwaway database; the caller drops it when done.
    /// Use a random name to avoid collisions between tests.
    fn test_substrate() -> MongoSubstrate {
        let uri = std::env::var("ROCKET_DB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let random: u32 = rand::random();
        MongoSubstrate::connect(&uri, &format!("test{random}")).unwrap()
    }

    #[test]
    fn handles_clone_without_connecting() {
        // Building a client doesn't contact the server.
        let client = Client::with_uri_str("mongodb://localhost:27017").unwrap();
        let substrate = MongoSubstrate::from_db(client.database("civs"));
        let copy = substrate.clone();
        assert_eq!(copy.database().name(), "civs");
        assert_eq!(copy.entries.name(), "state");
        assert_eq!(substrate.entries.clone().namespace(), copy.entries.namespace());
    }

    #[test]
    #[ignore = "requires a running MongoDB server"]
    fn round_trip() {
        let substrate = test_substrate();

        assert_eq!(substrate.get_state("k").unwrap(), None);
        substrate.put_state("k", br#"{"a":1}"#).unwrap();
        substrate.put_state("k", br#"{"a":2}"#).unwrap();
        substrate.put_state("k_votes", b"{}").unwrap();
        assert_eq!(
            substrate.get_state("k").unwrap().as_deref(),
            Some(&br#"{"a":2}"#[..])
        );
        assert_eq!(
            substrate.get_state("k_votes").unwrap().as_deref(),
            Some(&b"{}"[..])
        );

        substrate.database().drop(None).unwrap();
    }

    #[test]
    #[ignore = "requires a running MongoDB server"]
    fn chaincode_over_mongodb() {
        use std::sync::Arc;

        use crate::chaincode::Chaincode;
        use crate::logging::InvocationLog;

        let substrate = test_substrate();
        let db = substrate.database().clone();
        let chaincode = Chaincode::new(Arc::new(substrate));
        let log = InvocationLog::detached();
        let args = |a: &[&str]| a.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        chaincode
            .invoke(&log, "PutElection", &args(&["k", r#"{"a":1}"#]))
            .unwrap();
        chaincode.invoke(&log, "StartElection", &args(&["k"])).unwrap();
        assert_eq!(
            chaincode.query(&log, "GetElection", &args(&["k"])).unwrap(),
            br#"{"a":1,"state":"started"}"#
        );
        assert_eq!(
            chaincode.query(&log, "GetVotes", &args(&["k"])).unwrap(),
            b"{}"
        );

        db.drop(None).unwrap();
    }
}
