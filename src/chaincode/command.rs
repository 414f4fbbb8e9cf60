use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

use crate::error::{Error, Result};

use super::{Operation, Stub};

/// Which entry point a command is reachable through.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CommandClass {
    /// Commands that write to the ledger.
    Invoke,
    /// Read-only commands.
    Query,
}

/// Runs a command whose argument count has already been checked.
pub type Handler = fn(&Stub<'_>, &[String]) -> Result<Vec<u8>>;

/// A named operation together with its calling convention.
#[derive(Clone, Copy)]
pub struct Command {
    pub operation: Operation,
    pub class: CommandClass,
    pub arity: usize,
    handler: Handler,
}

impl Command {
    pub fn new(operation: Operation, class: CommandClass, arity: usize, handler: Handler) -> Self {
        Self {
            operation,
            class,
            arity,
            handler,
        }
    }

    /// Check the argument count, then run the handler.
    pub fn execute(&self, stub: &Stub<'_>, args: &[String]) -> Result<Vec<u8>> {
        if args.len() != self.arity {
            return Err(Error::ArgumentCount {
                operation: self.operation,
                expected: self.arity,
                actual: args.len(),
            });
        }
        (self.handler)(stub, args)
    }
}

impl Debug for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("operation", &self.operation)
            .field("class", &self.class)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// The fixed mapping from operation names to commands.
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: HashMap<Operation, Command>,
}

impl CommandTable {
    /// The table of every operation the chaincode supports.
    pub fn standard() -> Self {
        use CommandClass::*;
        use Operation::*;

        Self::from_commands([
            Command::new(PutElection, Invoke, 2, put_election),
            Command::new(StartElection, Invoke, 1, start_election),
            Command::new(StopElection, Invoke, 1, stop_election),
            Command::new(PutVotes, Invoke, 2, put_votes),
            Command::new(GetElection, Query, 1, get_election),
            Command::new(GetVotes, Query, 1, get_votes),
        ])
    }

    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().map(|c| (c.operation, c)).collect(),
        }
    }

    /// Find the command called `function`, restricted to `class` if given.
    ///
    /// A command that exists but belongs to another class is reported the
    /// same way as one that doesn't exist at all.
    pub fn resolve(&self, function: &str, class: Option<CommandClass>) -> Result<&Command> {
        let unsupported = || Error::UnsupportedOperation(function.to_string());
        let operation: Operation = function.parse()?;
        let command = self.commands.get(&operation).ok_or_else(unsupported)?;
        match class {
            Some(class) if class != command.class => Err(unsupported()),
            _ => Ok(command),
        }
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn put_election(stub: &Stub<'_>, args: &[String]) -> Result<Vec<u8>> {
    stub.elections().put(&args[0], args[1].as_bytes())?;
    Ok(Vec::new())
}

fn start_election(stub: &Stub<'_>, args: &[String]) -> Result<Vec<u8>> {
    stub.elections().start(&args[0])?;
    Ok(Vec::new())
}

fn stop_election(stub: &Stub<'_>, args: &[String]) -> Result<Vec<u8>> {
    stub.elections().stop(&args[0])?;
    Ok(Vec::new())
}

fn put_votes(stub: &Stub<'_>, args: &[String]) -> Result<Vec<u8>> {
    stub.votes().put(&args[0], args[1].as_bytes())?;
    Ok(Vec::new())
}

fn get_election(stub: &Stub<'_>, args: &[String]) -> Result<Vec<u8>> {
    stub.elections().get(&args[0])
}

fn get_votes(stub: &Stub<'_>, args: &[String]) -> Result<Vec<u8>> {
    stub.votes().get(&args[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_complete() {
        let table = CommandTable::standard();
        for op in Operation::ALL {
            let command = table.resolve(op.name(), None).unwrap();
            assert_eq!(command.operation, op);
        }
        assert_eq!(table.commands().count(), Operation::ALL.len());
    }

    #[test]
    fn classes_and_arities() {
        let table = CommandTable::standard();
        let expect = [
            ("PutElection", CommandClass::Invoke, 2),
            ("StartElection", CommandClass::Invoke, 1),
            ("StopElection", CommandClass::Invoke, 1),
            ("PutVotes", CommandClass::Invoke, 2),
            ("GetElection", CommandClass::Query, 1),
            ("GetVotes", CommandClass::Query, 1),
        ];
        for (name, class, arity) in expect {
            let command = table.resolve(name, Some(class)).unwrap();
            assert_eq!(command.class, class);
            assert_eq!(command.arity, arity);
        }
    }

    #[test]
    fn wrong_class_is_unsupported() {
        let table = CommandTable::standard();
        assert!(matches!(
            table.resolve("GetVotes", Some(CommandClass::Invoke)),
            Err(Error::UnsupportedOperation(name)) if name == "GetVotes"
        ));
        assert!(matches!(
            table.resolve("PutVotes", Some(CommandClass::Query)),
            Err(Error::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn partial_table_leaves_gaps() {
        let table = CommandTable::from_commands([Command::new(
            Operation::GetVotes,
            CommandClass::Query,
            1,
            get_votes,
        )]);
        assert!(table.resolve("GetVotes", None).is_ok());
        assert!(matches!(
            table.resolve("GetElection", None),
            Err(Error::UnsupportedOperation(_))
        ));
    }
}
