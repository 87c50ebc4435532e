use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_utils::parse_required;
use slashing_protection::SlashingDatabase;
use slog::{info, Logger};
use std::path::PathBuf;
use types::PublicKeyBytes;

pub const CMD: &str = "scan-source-epochs";

pub fn cli_app() -> Command {
    Command::new(CMD)
        .about(
            "Logs the lowest and highest attestation source epoch recorded in a slashing \
            protection database for each of the given validators.",
        )
        .arg(
            Arg::new("slashing-db")
                .long("slashing-db")
                .value_name("PATH")
                .action(ArgAction::Set)
                .required(true)
                .help("Path to an existing slashing protection SQLite database.")
                .display_order(0),
        )
        .arg(
            Arg::new("pubkeys")
                .long("pubkeys")
                .value_name("PUBKEYS")
                .action(ArgAction::Set)
                .required(true)
                .help("Comma-separated 0x-prefixed validator public keys.")
                .display_order(0),
        )
}

pub fn parse_pubkeys(value: &str) -> Result<Vec<PublicKeyBytes>, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|pubkey| !pubkey.is_empty())
        .map(|pubkey| {
            pubkey
                .parse()
                .map_err(|e| format!("Invalid public key {}: {}", pubkey, e))
        })
        .collect()
}

pub fn run(matches: &ArgMatches, log: &Logger) -> Result<(), String> {
    let db_path: PathBuf = parse_required(matches, "slashing-db")?;
    let pubkeys = parse_pubkeys(&parse_required::<String>(matches, "pubkeys")?)?;

    if !db_path.exists() {
        return Err(format!("No slashing database at {}", db_path.display()));
    }
    let slashing_db = SlashingDatabase::open(&db_path)
        .map_err(|e| format!("Unable to open slashing database: {}", e))?;

    let reports = slashing_db
        .scan_source_epochs(&pubkeys, log)
        .map_err(|e| format!("Unable to scan slashing database: {}", e))?;

    info!(
        log,
        "Finished scanning source epochs";
        "requested" => pubkeys.len(),
        "registered" => reports.len(),
        "with_attestations" => reports.iter().filter(|r| r.bounds.is_some()).count(),
    );

    Ok(())
}
