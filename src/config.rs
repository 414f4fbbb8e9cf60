use std::sync::Arc;

use log::{error, info};
use rocket::{
    fairing::{Fairing, Info, Kind},
    tokio::task::spawn_blocking,
    Build, Rocket,
};
use serde::Deserialize;

use crate::chaincode::Chaincode;
use crate::model::{
    mongodb::MongoSubstrate,
    substrate::{MemoryStore, Substrate},
};

/// Which substrate the chaincode keeps its state in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstrateKind {
    /// Process memory. Everything is lost on shutdown.
    Memory,
    /// A MongoDB database, configured by [`DbConfig`].
    Mongodb,
}

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Deserialize)]
pub struct Config {
    substrate: SubstrateKind,
}

impl Config {
    /// Where ledger state is kept.
    /// Configured via `SUBSTRATE`.
    pub fn substrate(&self) -> SubstrateKind {
        self.substrate
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the database.
#[derive(Debug, Deserialize)]
pub struct DbConfig {
    // secrets
    db_uri: String,
    // non-secrets
    #[serde(default = "default_db_name")]
    db_name: String,
}

fn default_db_name() -> String {
    "civs".to_string()
}

/// A fairing that builds the configured substrate and places the
/// [`Chaincode`] running over it into managed state.
///
/// Must be attached after [`ConfigFairing`].
pub struct SubstrateFairing;

#[rocket::async_trait]
impl Fairing for SubstrateFairing {
    fn info(&self) -> Info {
        Info {
            name: "Substrate",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let kind = match rocket.state::<Config>() {
            Some(config) => config.substrate(),
            None => {
                error!("Substrate requested before the application config was loaded");
                return Err(rocket);
            }
        };

        let substrate: Arc<dyn Substrate> = match kind {
            SubstrateKind::Memory => {
                info!("Using in-memory substrate; state will not survive a restart");
                Arc::new(MemoryStore::new())
            }
            SubstrateKind::Mongodb => {
                let config = match rocket.figment().extract::<DbConfig>() {
                    Ok(config) => config,
                    Err(e) => {
                        error!("Failed to load database config");
                        rocket::config::pretty_print_error(e);
                        return Err(rocket);
                    }
                };
                info!("Loaded database config, connecting...");
                // The driver is blocking; keep it off the async workers.
                let connected = spawn_blocking(move || {
                    MongoSubstrate::connect(&config.db_uri, &config.db_name)
                })
                .await;
                match connected {
                    Ok(Ok(substrate)) => {
                        info!("...database connection online!");
                        Arc::new(substrate)
                    }
                    Ok(Err(e)) => {
                        error!("Failed to connect to database: {e}");
                        return Err(rocket);
                    }
                    Err(e) => {
                        error!("Database connection task failed: {e}");
                        return Err(rocket);
                    }
                }
            }
        };

        Ok(rocket.manage(Arc::new(Chaincode::new(substrate))))
    }
}
