//! A command-line tool for running chaincode operations directly against a
//! MongoDB-backed ledger, bypassing the HTTP server.

use std::io::Write;
use std::sync::Arc;

use clap::{Arg, ArgAction, ArgMatches, Command};

use civs_backend::chaincode::Chaincode;
use civs_backend::logging::InvocationLog;
use civs_backend::model::mongodb::MongoSubstrate;

const PROGRAM_NAME: &str = "civs-cli";

const ABOUT_TEXT: &str = "Run a single CIVS ledger operation.

OPERATIONS:
    PutElection <key> <document>
    StartElection <key>
    StopElection <key>
    PutVotes <election key> <document>
    GetElection <key>
    GetVotes <election key>

EXIT CODES:
     0: The operation succeeded; any result is written to stdout.
     1: Error.";

const DB_URI: &str = "DB_URI";
const DB_NAME: &str = "DB_NAME";
const FUNCTION: &str = "FUNCTION";
const ARGS: &str = "ARGS";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(DB_URI)
                .long("db-uri")
                .help("MongoDB connection string")
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(DB_NAME)
                .long("db-name")
                .help("Database holding the ledger state")
                .action(ArgAction::Set)
                .default_value("civs"),
        )
        .arg(
            Arg::new(FUNCTION)
                .help("The operation to run")
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(ARGS)
                .help("Arguments to the operation")
                .action(ArgAction::Append)
                .num_args(0..),
        )
}

/// The pieces of a parsed command line.
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    db_uri: String,
    db_name: String,
    function: String,
    args: Vec<String>,
}

impl Invocation {
    fn from_matches(matches: &ArgMatches) -> Self {
        // Required and defaulted arguments are guaranteed to be present.
        let get = |id: &str| matches.get_one::<String>(id).cloned().unwrap_or_default();
        Self {
            db_uri: get(DB_URI),
            db_name: get(DB_NAME),
            function: get(FUNCTION),
            args: matches
                .get_many::<String>(ARGS)
                .map(|args| args.cloned().collect())
                .unwrap_or_default(),
        }
    }
}

/// Run the operation, report the result, and return the exit code.
fn run(invocation: Invocation) -> u8 {
    let substrate = match MongoSubstrate::connect(&invocation.db_uri, &invocation.db_name) {
        Ok(substrate) => substrate,
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            return 1;
        }
    };
    let chaincode = Chaincode::new(Arc::new(substrate));
    let log = InvocationLog::detached().with_target("civs_cli");

    match chaincode.dispatch(&log, &invocation.function, &invocation.args) {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if !output.is_empty() {
                if let Err(e) = stdout.write_all(&output).and_then(|_| writeln!(stdout)) {
                    eprintln!("Failed to write result: {e}");
                    return 1;
                }
            }
            0
        }
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

fn main() {
    let matches = cli().get_matches();
    let exit_code = run(Invocation::from_matches(&matches));
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_cli_usage() {
        let command_line = [
            PROGRAM_NAME,
            "--db-uri",
            "mongodb://localhost:27017",
            "PutElection",
            "mayor",
            r#"{"name": "Mayor"}"#,
        ];
        let matches = cli().try_get_matches_from(command_line).unwrap();
        assert_eq!(
            Invocation::from_matches(&matches),
            Invocation {
                db_uri: "mongodb://localhost:27017".to_string(),
                db_name: "civs".to_string(),
                function: "PutElection".to_string(),
                args: vec!["mayor".to_string(), r#"{"name": "Mayor"}"#.to_string()],
            }
        );

        let command_line = [
            PROGRAM_NAME,
            "--db-uri",
            "mongodb://db",
            "--db-name",
            "elections",
            "GetVotes",
            "mayor",
        ];
        let matches = cli().try_get_matches_from(command_line).unwrap();
        let invocation = Invocation::from_matches(&matches);
        assert_eq!(invocation.db_name, "elections");
        assert_eq!(invocation.args, vec!["mayor".to_string()]);
    }

    #[test]
    fn arguments_are_optional_to_clap() {
        // Arity is the chaincode's business, not the parser's.
        let command_line = [PROGRAM_NAME, "--db-uri", "mongodb://db", "StartElection"];
        let matches = cli().try_get_matches_from(command_line).unwrap();
        assert!(Invocation::from_matches(&matches).args.is_empty());
    }

    #[test]
    fn bad_cli_usage() {
        // No function.
        let command_line = [PROGRAM_NAME, "--db-uri", "mongodb://db"];
        cli().try_get_matches_from(command_line).unwrap_err();

        // No options at all.
        let command_line = [PROGRAM_NAME];
        cli().try_get_matches_from(command_line).unwrap_err();
    }
}
