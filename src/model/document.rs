use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A payload that failed to parse as a JSON document.
#[derive(Debug, Error)]
#[error("Invalid json: {0}")]
pub struct InvalidDocument(#[from] serde_json::Error);

/// An arbitrary structured document: object, array, string, number, bool or null.
///
/// Equality is structural, so two documents that differ only in whitespace or
/// object field order compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Document {
    /// The empty object, `{}`.
    pub fn empty_object() -> Self {
        Self(Value::Object(Default::default()))
    }

    /// Parse raw bytes as a document.
    pub fn parse(payload: &[u8]) -> Result<Self, InvalidDocument> {
        Ok(Self(serde_json::from_slice(payload)?))
    }

    /// Serialize this document. Object fields keep the order they were parsed
    /// or inserted in, and numbers keep the digits they were written with.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_string().into_bytes()
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check that a payload is a valid document.
///
/// This is the same parse that later reads of the document perform, so a
/// payload that passes here can always be read back. No check is made on the
/// shape of the document.
pub fn validate(payload: &[u8]) -> Result<(), InvalidDocument> {
    Document::parse(payload).map(drop)
}
