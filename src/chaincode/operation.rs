use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::Error;

/// Every operation the chaincode understands, by the name callers invoke it with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    PutElection,
    StartElection,
    StopElection,
    PutVotes,
    GetElection,
    GetVotes,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::PutElection,
        Operation::StartElection,
        Operation::StopElection,
        Operation::PutVotes,
        Operation::GetElection,
        Operation::GetVotes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::PutElection => "PutElection",
            Operation::StartElection => "StartElection",
            Operation::StopElection => "StopElection",
            Operation::PutVotes => "PutVotes",
            Operation::GetElection => "GetElection",
            Operation::GetVotes => "GetVotes",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::UnsupportedOperation(s.to_string()))
    }
}
