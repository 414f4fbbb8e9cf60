use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chaincode::Operation;
use crate::error::{Error, Result};
use crate::logging::InvocationLog;
use crate::model::document::{self, InvalidDocument};
use crate::model::substrate::Substrate;

/// Field of an election document reserved for the lifecycle state.
pub const STATE_FIELD: &str = "state";

/// States in the Election lifecycle.
///
/// An election that has never been started or stopped has no state at all.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionState {
    /// Open for voting.
    Started,
    /// Closed for voting.
    Stopped,
}

impl ElectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ElectionState::Started => "started",
            ElectionState::Stopped => "stopped",
        }
    }

    /// The operation that moves an election into this state.
    pub fn operation(self) -> Operation {
        match self {
            ElectionState::Started => Operation::StartElection,
            ElectionState::Stopped => Operation::StopElection,
        }
    }
}

impl Display for ElectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An election document that is known to be a JSON object.
///
/// Every field other than [`STATE_FIELD`] is opaque and carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionDocument(Map<String, Value>);

impl ElectionDocument {
    /// Parse stored bytes, requiring an object. Empty bytes do not parse.
    pub fn parse(payload: &[u8]) -> std::result::Result<Self, InvalidDocument> {
        Ok(Self(serde_json::from_slice(payload)?))
    }

    /// The current lifecycle state, if set to a recognised value.
    pub fn state(&self) -> Option<ElectionState> {
        self.0
            .get(STATE_FIELD)
            .and_then(|v| ElectionState::deserialize(v).ok())
    }

    pub fn set_state(&mut self, state: ElectionState) {
        self.0
            .insert(STATE_FIELD.to_string(), Value::from(state.as_str()));
    }

    /// Serialize with fields in the order they were read. A newly added state
    /// comes last.
    pub fn to_vec(&self) -> Vec<u8> {
        Value::Object(self.0.clone()).to_string().into_bytes()
    }
}

/// Read and write access to election records for one invocation.
pub struct ElectionRepository<'a> {
    substrate: &'a dyn Substrate,
    log: &'a InvocationLog,
}

impl<'a> ElectionRepository<'a> {
    pub fn new(substrate: &'a dyn Substrate, log: &'a InvocationLog) -> Self {
        Self { substrate, log }
    }

    /// Store a new election document under `key`, replacing any existing one.
    ///
    /// Nothing is written if the payload is not a valid document.
    pub fn put(&self, key: &str, payload: &[u8]) -> Result<()> {
        const OP: Operation = Operation::PutElection;
        if let Err(e) = document::validate(payload) {
            self.log
                .warn(format_args!("{OP} rejected payload for '{key}': {e}"));
            return Err(Error::invalid_document(OP)(e));
        }
        self.write(OP, key, payload)
    }

    /// The election document exactly as stored, or empty bytes if there is none.
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.fetch(Operation::GetElection, key)
    }

    pub fn start(&self, key: &str) -> Result<()> {
        self.set_state(key, ElectionState::Started)
    }

    pub fn stop(&self, key: &str) -> Result<()> {
        self.set_state(key, ElectionState::Stopped)
    }

    /// Overwrite the lifecycle state of an existing election.
    ///
    /// The current value of the state is not consulted, so repeating a
    /// transition is harmless. Fails if there is no election under `key` or
    /// it is not an object.
    pub fn set_state(&self, key: &str, state: ElectionState) -> Result<()> {
        let op = state.operation();
        let stored = self.fetch(op, key)?;
        let mut election = ElectionDocument::parse(&stored).map_err(|e| {
            self.log
                .warn(format_args!("{op} found no election object at '{key}': {e}"));
            Error::invalid_document(op)(e)
        })?;
        election.set_state(state);
        self.write(op, key, &election.to_vec())
    }

    fn fetch(&self, operation: Operation, key: &str) -> Result<Vec<u8>> {
        let data = self.substrate.get_state(key).map_err(|e| {
            self.log
                .error(format_args!("Error getting state for '{key}': {e}"));
            Error::storage(operation)(e)
        })?;
        let data = data.unwrap_or_default();
        self.log
            .debug(format_args!("Fetched {} bytes from '{key}'", data.len()));
        Ok(data)
    }

    fn write(&self, operation: Operation, key: &str, value: &[u8]) -> Result<()> {
        self.substrate.put_state(key, value).map_err(|e| {
            self.log
                .error(format_args!("Error updating state for '{key}': {e}"));
            Error::storage(operation)(e)
        })?;
        self.log
            .debug(format_args!("Wrote {} bytes to '{key}'", value.len()));
        Ok(())
    }
}
