//! The command surface of the ledger: named operations with string arguments.

use std::sync::Arc;

use crate::error::Result;
use crate::logging::InvocationLog;
use crate::model::{election::ElectionRepository, substrate::Substrate, votes::VoteRepository};

mod command;
mod operation;

pub use command::{Command, CommandClass, CommandTable, Handler};
pub use operation::Operation;

/// Everything a command handler may use during one invocation.
pub struct Stub<'a> {
    substrate: &'a dyn Substrate,
    log: &'a InvocationLog,
}

impl<'a> Stub<'a> {
    pub fn new(substrate: &'a dyn Substrate, log: &'a InvocationLog) -> Self {
        Self { substrate, log }
    }

    pub fn elections(&self) -> ElectionRepository<'a> {
        ElectionRepository::new(self.substrate, self.log)
    }

    pub fn votes(&self) -> VoteRepository<'a> {
        VoteRepository::new(self.substrate, self.log)
    }
}

/// The election ledger chaincode.
///
/// Holds no state of its own between invocations: every invocation reads the
/// substrate afresh.
pub struct Chaincode {
    substrate: Arc<dyn Substrate>,
    commands: CommandTable,
}

impl Chaincode {
    pub fn new(substrate: Arc<dyn Substrate>) -> Self {
        Self::with_commands(substrate, CommandTable::standard())
    }

    pub fn with_commands(substrate: Arc<dyn Substrate>, commands: CommandTable) -> Self {
        Self {
            substrate,
            commands,
        }
    }

    /// Called once when the chaincode is deployed. There is nothing to set up.
    pub fn init(&self, log: &InvocationLog, function: &str, _args: &[String]) -> Result<Vec<u8>> {
        log.info(format_args!("Initialising with function '{function}'"));
        Ok(Vec::new())
    }

    /// Run a command that changes the ledger.
    pub fn invoke(&self, log: &InvocationLog, function: &str, args: &[String]) -> Result<Vec<u8>> {
        log.info(format_args!("Invoking function '{function}'"));
        self.execute(log, function, Some(CommandClass::Invoke), args)
    }

    /// Run a read-only command.
    pub fn query(&self, log: &InvocationLog, function: &str, args: &[String]) -> Result<Vec<u8>> {
        log.info(format_args!("Querying function '{function}'"));
        self.execute(log, function, Some(CommandClass::Query), args)
    }

    /// Run any command, whichever class it belongs to.
    pub fn dispatch(&self, log: &InvocationLog, function: &str, args: &[String]) -> Result<Vec<u8>> {
        log.info(format_args!("Dispatching function '{function}'"));
        self.execute(log, function, None, args)
    }

    fn execute(
        &self,
        log: &InvocationLog,
        function: &str,
        class: Option<CommandClass>,
        args: &[String],
    ) -> Result<Vec<u8>> {
        let command = self.commands.resolve(function, class)?;
        let stub = Stub::new(self.substrate.as_ref(), log);
        let result = command.execute(&stub, args);
        match &result {
            Ok(bytes) => log.debug(format_args!(
                "{} returned {} bytes",
                command.operation,
                bytes.len()
            )),
            Err(e) => log.warn(format_args!("{e}")),
        }
        result
    }
}
