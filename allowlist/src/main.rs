//! merkleme CLI

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use merkleme_allowlist::{
    commands::{self, Outcome},
    parse_odd, read_list, Category, Config, Error, Provider,
};
use merkleme_merkle::HexProof;
use serde::Serialize;
use std::{path::PathBuf, process::ExitCode};
use tracing::error;

/// Returns the version of the crate.
pub const fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Flag for verbose output
const VERBOSE_FLAG: &str = "verbose";

/// Arguments shared by every command that hashes members.
fn with_options(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to YAML config file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("hash")
                .long("hash")
                .help("Hash function (overrides config)")
                .value_parser(["keccak256", "sha256"]),
        )
        .arg(
            Arg::new("encoding")
                .long("encoding")
                .help("How members are turned into bytes before hashing (overrides config)")
                .value_parser(["utf8", "hex"]),
        )
        .arg(
            Arg::new("odd")
                .long("odd")
                .help("How the last node of an odd layer is paired (overrides config)")
                .value_parser(["duplicate", "promote"]),
        )
}

/// Arguments selecting the list to build a tree over.
fn with_list(command: Command) -> Command {
    command
        .arg(
            Arg::new("input")
                .long("input")
                .help("Path to a JSON array of members")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("category")
                .long("category")
                .help("Allowlist to resolve (1-4 or shadow, og, white, degen)")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            Arg::new("whitelist")
                .long("whitelist")
                .requires("category")
                .help("Content URI of the list, read from the configured directory by its CID")
                .value_parser(clap::value_parser!(String)),
        )
        .group(
            ArgGroup::new("list")
                .args(["input", "category"])
                .required(true),
        )
}

/// Entrypoint for the merkleme CLI
fn main() -> ExitCode {
    // Define application
    let matches = Command::new("merkleme")
        .version(crate_version())
        .about("Commit to allowlists with sorted-pair Merkle trees and prove membership.")
        .arg(
            Arg::new(VERBOSE_FLAG)
                .short('v')
                .long(VERBOSE_FLAG)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            with_options(with_list(
                Command::new(commands::GENERATE_CMD)
                    .about("Build a tree over a list and print its root and member table.")
                    .arg(
                        Arg::new("out")
                            .long("out")
                            .help("Directory to write the list, root, and member table to")
                            .value_parser(clap::value_parser!(PathBuf)),
                    ),
            )),
        )
        .subcommand(
            with_options(with_list(
                Command::new(commands::PROVE_CMD)
                    .about("Print an inclusion proof for a member of a list.")
                    .arg(
                        Arg::new("leaf")
                            .long("leaf")
                            .required(true)
                            .help("Member to prove")
                            .value_parser(clap::value_parser!(String)),
                    ),
            )),
        )
        .subcommand(with_options(
            Command::new(commands::VERIFY_CMD)
                .about("Check an inclusion proof against a root.")
                .arg(
                    Arg::new("root")
                        .long("root")
                        .required(true)
                        .help("Root hash the member should be committed under")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    Arg::new("leaf")
                        .long("leaf")
                        .requires("proof")
                        .help("Member to verify")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    Arg::new("proof")
                        .long("proof")
                        .requires("leaf")
                        .help("Comma-separated sibling hashes")
                        .value_delimiter(',')
                        .num_args(0..)
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    Arg::new("proof-file")
                        .long("proof-file")
                        .help("Path to a proof as printed by prove")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .group(
                    ArgGroup::new("claim")
                        .args(["leaf", "proof-file"])
                        .required(true),
                ),
        ))
        .get_matches();

    // Create logger
    let level = if matches.get_flag(VERBOSE_FLAG) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    // Parse subcommands
    match matches.subcommand() {
        Some((commands::GENERATE_CMD, matches)) => match generate(matches) {
            Ok(()) => return ExitCode::SUCCESS,
            Err(e) => error!(error=?e, "failed to generate tree"),
        },
        Some((commands::PROVE_CMD, matches)) => match prove(matches) {
            Ok(true) => return ExitCode::SUCCESS,
            Ok(false) => {}
            Err(e) => error!(error=?e, "failed to generate proof"),
        },
        Some((commands::VERIFY_CMD, matches)) => match verify(matches) {
            Ok(true) => return ExitCode::SUCCESS,
            Ok(false) => {}
            Err(e) => error!(error=?e, "failed to verify proof"),
        },
        Some((cmd, _)) => {
            error!(cmd, "invalid subcommand");
        }
        None => {
            error!("no subcommand provided");
        }
    }
    ExitCode::FAILURE
}

/// Load the config file (if any) and apply command-line overrides.
fn load_config(matches: &ArgMatches) -> Result<Config, Error> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(hash) = matches.get_one::<String>("hash") {
        config.hash = hash.parse()?;
    }
    if let Some(encoding) = matches.get_one::<String>("encoding") {
        config.encoding = encoding.parse()?;
    }
    if let Some(odd) = matches.get_one::<String>("odd") {
        config.odd = parse_odd(odd)?;
    }
    Ok(config)
}

/// Resolve the members selected by `--input` or `--category`.
fn members(matches: &ArgMatches, config: &mut Config) -> Result<Vec<String>, Error> {
    if let Some(input) = matches.get_one::<PathBuf>("input") {
        return read_list(input);
    }
    let category = matches
        .get_one::<String>("category")
        .ok_or_else(|| Error::InvalidCategory(String::new()))?
        .parse::<Category>()?;
    if let Some(uri) = matches.get_one::<String>("whitelist") {
        config.sources.insert(category, uri.clone());
        config.directory.get_or_insert_with(|| PathBuf::from("."));
    }
    config.provider().resolve(category)
}

fn print<T: Serialize>(value: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn generate(matches: &ArgMatches) -> Result<(), Error> {
    let mut config = load_config(matches)?;
    let members = members(matches, &mut config)?;
    let summary = commands::generate(&config, &members)?;
    if let Some(out) = matches.get_one::<PathBuf>("out") {
        commands::publish(out, &members, &summary)?;
    }
    print(&summary)
}

fn prove(matches: &ArgMatches) -> Result<bool, Error> {
    let mut config = load_config(matches)?;
    let members = members(matches, &mut config)?;
    let leaf = matches.get_one::<String>("leaf").unwrap();
    let outcome = commands::prove(&config, &members, leaf)?;
    print(&outcome)?;
    Ok(matches!(outcome, Outcome::Found(_)))
}

fn verify(matches: &ArgMatches) -> Result<bool, Error> {
    let config = load_config(matches)?;
    let root = matches.get_one::<String>("root").unwrap();
    let verdict = match matches.get_one::<PathBuf>("proof-file") {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| Error::Read(path.clone(), e))?;
            let proof: HexProof = serde_json::from_slice(&bytes)?;
            commands::verify_hex(&config, &proof, root)?
        }
        None => {
            let leaf = matches.get_one::<String>("leaf").unwrap();
            let proof: Vec<&String> = matches
                .get_many::<String>("proof")
                .map(|siblings| siblings.collect())
                .unwrap_or_default();
            commands::verify(&config, leaf, root, &proof)?
        }
    };
    print(&verdict)?;
    Ok(verdict.valid)
}
