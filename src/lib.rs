#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use std::sync::Arc;

use rocket::{Build, Rocket};

use crate::chaincode::Chaincode;
use crate::config::{ConfigFairing, SubstrateFairing};
use crate::logging::LoggerFairing;
use crate::model::substrate::Substrate;

pub mod api;
pub mod chaincode;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

/// Build the server, with its substrate chosen by configuration.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(SubstrateFairing)
}

/// Build the server over an already-constructed substrate.
pub fn rocket_for_substrate(substrate: Arc<dyn Substrate>) -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(LoggerFairing)
        .manage(Arc::new(Chaincode::new(substrate)))
}
