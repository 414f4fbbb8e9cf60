use std::sync::Arc;

use rocket::{http::ContentType, serde::json::Json, tokio::task::spawn_blocking, Route, State};
use serde::{Deserialize, Serialize};

use crate::chaincode::Chaincode;
use crate::error::{Error, Result};
use crate::logging::{InvocationLog, RequestId};

pub fn routes() -> Vec<Route> {
    routes![init, invoke, query]
}

/// A function name and its arguments, as sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaincodeInput {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

type EntryPoint = fn(&Chaincode, &InvocationLog, &str, &[String]) -> Result<Vec<u8>>;

#[post("/init", data = "<input>", format = "json")]
async fn init(
    input: Json<ChaincodeInput>,
    chaincode: &State<Arc<Chaincode>>,
    id: &RequestId,
) -> Result<(ContentType, Vec<u8>)> {
    run(chaincode, *id, input.0, Chaincode::init).await
}

#[post("/invoke", data = "<input>", format = "json")]
async fn invoke(
    input: Json<ChaincodeInput>,
    chaincode: &State<Arc<Chaincode>>,
    id: &RequestId,
) -> Result<(ContentType, Vec<u8>)> {
    run(chaincode, *id, input.0, Chaincode::invoke).await
}

#[post("/query", data = "<input>", format = "json")]
async fn query(
    input: Json<ChaincodeInput>,
    chaincode: &State<Arc<Chaincode>>,
    id: &RequestId,
) -> Result<(ContentType, Vec<u8>)> {
    run(chaincode, *id, input.0, Chaincode::query).await
}

/// Run an entry point on the blocking pool; the substrate may block on I/O.
async fn run(
    chaincode: &State<Arc<Chaincode>>,
    id: RequestId,
    input: ChaincodeInput,
    entry: EntryPoint,
) -> Result<(ContentType, Vec<u8>)> {
    let chaincode = Arc::clone(chaincode.inner());
    let log = InvocationLog::new(id);
    let output = spawn_blocking(move || entry(&chaincode, &log, &input.function, &input.args))
        .await
        .map_err(|e| Error::Interrupted(e.to_string()))??;
    Ok((ContentType::JSON, output))
}
