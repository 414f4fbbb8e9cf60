use std::fmt::{Arguments, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{error, info, warn, Level};
use rocket::{
    fairing::{Fairing, Info, Kind},
    http::StatusClass,
    request::{FromRequest, Outcome},
    Data, Orbit, Request, Response, Rocket,
};

/// A unique identifier for a particular request or invocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> RequestId {
        static REQUEST_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        RequestId(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Allow the ID to be accessed via request guard.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for &'r RequestId {
    type Error = (); // No errors possible, use the `!` type once stabilised.

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(req.local_cache(RequestId::next))
    }
}

/// The logging handle for a single chaincode invocation.
///
/// Created by whoever receives the invocation and handed down to every
/// component that runs on its behalf, so that each line it writes carries the
/// ID of the invocation it belongs to.
#[derive(Debug, Clone)]
pub struct InvocationLog {
    id: RequestId,
    target: &'static str,
}

impl InvocationLog {
    pub const DEFAULT_TARGET: &'static str = "civs_backend::chaincode";

    pub fn new(id: RequestId) -> Self {
        Self {
            id,
            target: Self::DEFAULT_TARGET,
        }
    }

    /// A handle with a fresh ID, for invocations that don't arrive over HTTP.
    pub fn detached() -> Self {
        Self::new(RequestId::next())
    }

    /// Use a different log target, e.g. to route a tool's output separately.
    pub fn with_target(mut self, target: &'static str) -> Self {
        self.target = target;
        self
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn log(&self, level: Level, args: Arguments<'_>) {
        log::log!(target: self.target, level, "inv{} {}", self.id, args);
    }

    pub fn error(&self, args: Arguments<'_>) {
        self.log(Level::Error, args)
    }

    pub fn warn(&self, args: Arguments<'_>) {
        self.log(Level::Warn, args)
    }

    pub fn info(&self, args: Arguments<'_>) {
        self.log(Level::Info, args)
    }

    pub fn debug(&self, args: Arguments<'_>) {
        self.log(Level::Debug, args)
    }
}

/// A rocket fairing that does global logging, e.g. logging every request and response.
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let protocol = if rocket.config().tls_enabled() {
            "https"
        } else {
            "http"
        };
        let ip = &rocket.config().address;
        let port = &rocket.config().port;
        info!("Chaincode listening on {protocol}://{ip}:{port}");
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        let id = req.local_cache(RequestId::next);
        let method = req.method();
        let uri = req.uri();
        info!("->req{id} {method} {uri}");
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let id = req.local_cache(RequestId::next);
        let code = res.status();
        let route = match req.route() {
            Some(r) => {
                let mut str = r.uri.to_string();
                if let Some(ref name) = r.name {
                    str = format!("{name} ({str})");
                }
                str
            }
            None => "UNKNOWN ROUTE".to_string(),
        };
        let log_msg = format!("<-rsp{id} {code} {route}");
        match code.class() {
            StatusClass::ServerError => error!("{log_msg}"),
            StatusClass::ClientError => warn!("{log_msg}"),
            _ => info!("{log_msg}"),
        }
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutdown requested, stopping gracefully...");
    }
}
