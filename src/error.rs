use log::{error, warn};
use rocket::{
    http::{Status, StatusClass},
    response::Responder,
    Request,
};
use thiserror::Error;

use crate::chaincode::Operation;
use crate::model::{document::InvalidDocument, substrate::StorageError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{operation} operation must include {}, got {actual}", count_arguments(.expected))]
    ArgumentCount {
        operation: Operation,
        expected: usize,
        actual: usize,
    },
    #[error("{operation} operation failed. {source}")]
    InvalidDocument {
        operation: Operation,
        source: InvalidDocument,
    },
    #[error("Unsupported operation '{0}'")]
    UnsupportedOperation(String),
    #[error("{operation} operation failed. Error accessing state: {source}")]
    Storage {
        operation: Operation,
        source: StorageError,
    },
    /// The task running an invocation ended without producing a result.
    #[error("Invocation interrupted: {0}")]
    Interrupted(String),
}

impl Error {
    pub fn invalid_document(operation: Operation) -> impl FnOnce(InvalidDocument) -> Self {
        move |source| Self::InvalidDocument { operation, source }
    }

    pub fn storage(operation: Operation) -> impl FnOnce(StorageError) -> Self {
        move |source| Self::Storage { operation, source }
    }

    pub fn status(&self) -> Status {
        match self {
            Self::ArgumentCount { .. } | Self::InvalidDocument { .. } => Status::BadRequest,
            Self::UnsupportedOperation(_) => Status::NotFound,
            Self::Storage { .. } | Self::Interrupted(_) => Status::InternalServerError,
        }
    }
}

fn count_arguments(n: &usize) -> String {
    match *n {
        0 => "no arguments".to_string(),
        1 => "one argument".to_string(),
        2 => "two arguments".to_string(),
        n => format!("{n} arguments"),
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        if status.class() == StatusClass::ServerError {
            error!("{self}");
        } else {
            warn!("{self}");
        }
        (status, self.to_string()).respond_to(req)
    }
}
