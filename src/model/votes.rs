use crate::chaincode::Operation;
use crate::error::{Error, Result};
use crate::logging::InvocationLog;
use crate::model::document;
use crate::model::keys::votes_key;
use crate::model::substrate::Substrate;

/// What a votes record reads as before anything has been written to it.
pub const EMPTY_VOTES: &[u8] = b"{}";

/// Read and write access to the votes record of an election.
///
/// The contents of a votes record are opaque; the only requirement is that
/// they are a valid document.
pub struct VoteRepository<'a> {
    substrate: &'a dyn Substrate,
    log: &'a InvocationLog,
}

impl<'a> VoteRepository<'a> {
    pub fn new(substrate: &'a dyn Substrate, log: &'a InvocationLog) -> Self {
        Self { substrate, log }
    }

    /// Replace the votes record of `election_key`.
    pub fn put(&self, election_key: &str, payload: &[u8]) -> Result<()> {
        const OP: Operation = Operation::PutVotes;
        document::validate(payload).map_err(|e| {
            self.log.warn(format_args!(
                "{OP} rejected payload for '{election_key}': {e}"
            ));
            Error::invalid_document(OP)(e)
        })?;

        let key = votes_key(election_key);
        self.substrate.put_state(&key, payload).map_err(|e| {
            self.log
                .error(format_args!("Error updating state for '{key}': {e}"));
            Error::storage(OP)(e)
        })?;
        self.log
            .debug(format_args!("Wrote {} bytes to '{key}'", payload.len()));
        Ok(())
    }

    /// The votes record of `election_key`, or `{}` if none has been written.
    pub fn get(&self, election_key: &str) -> Result<Vec<u8>> {
        let key = votes_key(election_key);
        let data = self.substrate.get_state(&key).map_err(|e| {
            self.log
                .error(format_args!("Error getting state for '{key}': {e}"));
            Error::storage(Operation::GetVotes)(e)
        })?;
        match data {
            Some(data) if !data.is_empty() => Ok(data),
            _ => Ok(EMPTY_VOTES.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::model::document::Document;
    use crate::model::election::ElectionRepository;
    use crate::model::substrate::{testing::FailingStore, MemoryStore};

    use super::*;

    #[test]
    fn absent_votes_read_as_empty_object() {
        let store = MemoryStore::new();
        let log = InvocationLog::detached();
        let votes = VoteRepository::new(&store, &log);

        assert_eq!(votes.get("fresh").unwrap(), b"{}");
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        let log = InvocationLog::detached();
        let votes = VoteRepository::new(&store, &log);

        votes.put("k", br#"{"x":[1,2]}"#).unwrap();
        assert_eq!(
            Document::parse(&votes.get("k").unwrap()).unwrap(),
            Document::from(json!({"x": [1, 2]}))
        );
        assert_eq!(store.get_state("k_votes").unwrap().unwrap(), br#"{"x":[1,2]}"#);
        assert_eq!(store.get_state("k").unwrap(), None);
    }

    #[test]
    fn votes_are_independent_of_election() {
        let store = MemoryStore::new();
        let log = InvocationLog::detached();
        let votes = VoteRepository::new(&store, &log);
        let elections = ElectionRepository::new(&store, &log);

        // No election needs to exist for votes to be recorded.
        votes.put("k", b"[\"ballot\"]").unwrap();
        assert!(elections.get("k").unwrap().is_empty());

        elections.put("k", br#"{"a":1}"#).unwrap();
        elections.start("k").unwrap();
        assert_eq!(votes.get("k").unwrap(), b"[\"ballot\"]");
    }

    #[test]
    fn invalid_votes_rejected() {
        let store = MemoryStore::new();
        let log = InvocationLog::detached();
        let votes = VoteRepository::new(&store, &log);

        votes.put("k", b"{\"ok\":true}").unwrap();
        let err = votes.put("k", b"{\"ok\":").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDocument {
                operation: Operation::PutVotes,
                ..
            }
        ));
        assert_eq!(votes.get("k").unwrap(), b"{\"ok\":true}");
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn storage_failures_propagate() {
        let store = MemoryStore::new();
        let log = InvocationLog::detached();

        let failing = FailingStore::reads(store.clone());
        let votes = VoteRepository::new(&failing, &log);
        assert!(matches!(
            votes.get("k").unwrap_err(),
            Error::Storage {
                operation: Operation::GetVotes,
                ..
            }
        ));

        let failing = FailingStore::writes(store.clone());
        let votes = VoteRepository::new(&failing, &log);
        assert!(matches!(
            votes.put("k", b"{}").unwrap_err(),
            Error::Storage {
                operation: Operation::PutVotes,
                ..
            }
        ));
        assert!(store.is_empty());
    }
}
