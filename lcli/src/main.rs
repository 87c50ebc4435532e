mod check_wss_checkpoint;
mod list_boot_nodes;
mod object_file;
mod process_header;
mod scan_source_epochs;

use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_utils::flags::{
    DEBUG_LEVEL_FLAG, LOG_FORMAT_FLAG, SPEC_CONFIG_FLAG, SPEC_FLAG, TESTNET_DIR_FLAG,
};
use clap_utils::parse_optional;
use eth2_network_config::Eth2NetworkConfig;
use logging::{build_logger, LogFormat, LoggerConfig};
use slog::{debug, Logger};
use std::path::PathBuf;
use std::process;
use types::{ChainSpec, Config};

fn cli_app() -> Command {
    Command::new("lcli")
        .version(env!("CARGO_PKG_VERSION"))
        .display_order(0)
        .about("Admits block headers into beacon states and inspects validator data.")
        .arg(
            Arg::new(SPEC_FLAG)
                .short('s')
                .long(SPEC_FLAG)
                .value_name("STRING")
                .action(ArgAction::Set)
                .value_parser(["minimal", "mainnet"])
                .default_value("mainnet")
                .global(true)
                .help("The chain spec preset to use.")
                .display_order(0),
        )
        .arg(
            Arg::new(SPEC_CONFIG_FLAG)
                .long(SPEC_CONFIG_FLAG)
                .value_name("PATH")
                .action(ArgAction::Set)
                .global(true)
                .conflicts_with(TESTNET_DIR_FLAG)
                .help(
                    "A YAML chain config. Keys it sets override the --spec preset; keys it omits \
                    keep their preset value.",
                )
                .display_order(0),
        )
        .arg(
            Arg::new(TESTNET_DIR_FLAG)
                .short('d')
                .long(TESTNET_DIR_FLAG)
                .value_name("PATH")
                .action(ArgAction::Set)
                .global(true)
                .help(
                    "A network directory holding config.yaml and optionally boot_nodes.yaml \
                    and genesis.ssz. Its config takes precedence over --spec.",
                )
                .display_order(0),
        )
        .arg(
            Arg::new(DEBUG_LEVEL_FLAG)
                .long(DEBUG_LEVEL_FLAG)
                .value_name("LEVEL")
                .action(ArgAction::Set)
                .value_parser(["info", "debug", "trace", "warn", "error", "crit"])
                .default_value("info")
                .global(true)
                .help("The verbosity level for emitting logs.")
                .display_order(0),
        )
        .arg(
            Arg::new(LOG_FORMAT_FLAG)
                .long(LOG_FORMAT_FLAG)
                .value_name("FORMAT")
                .action(ArgAction::Set)
                .value_parser(["TEXT", "JSON"])
                .ignore_case(true)
                .default_value("TEXT")
                .global(true)
                .help("Specifies the log format used when emitting logs to the terminal.")
                .display_order(0),
        )
        .subcommand(process_header::cli_app())
        .subcommand(check_wss_checkpoint::cli_app())
        .subcommand(list_boot_nodes::cli_app())
        .subcommand(scan_source_epochs::cli_app())
}

fn main() {
    let matches = cli_app().get_matches();

    let result = get_logger(&matches).and_then(|log| run(&matches, &log));

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("Failed to run lcli: {}", e);
            process::exit(1)
        }
    }
}

fn get_logger(matches: &ArgMatches) -> Result<Logger, String> {
    let config = LoggerConfig {
        debug_level: parse_optional(matches, DEBUG_LEVEL_FLAG)?
            .unwrap_or_else(|| "info".to_string()),
        log_format: parse_optional::<LogFormat>(matches, LOG_FORMAT_FLAG)?.unwrap_or_default(),
    };
    build_logger(&config)
}

/// Resolves the chain spec from, in order of precedence, `--testnet-dir`, `--spec-config` and
/// the `--spec` preset.
fn get_chain_spec(
    matches: &ArgMatches,
    network_config: Option<&Eth2NetworkConfig>,
) -> Result<ChainSpec, String> {
    if let Some(network_config) = network_config {
        return Ok(network_config.chain_spec());
    }

    let preset = match matches.get_one::<String>(SPEC_FLAG).map(String::as_str) {
        Some("minimal") => ChainSpec::minimal(),
        Some("mainnet") | None => ChainSpec::mainnet(),
        Some(other) => return Err(format!("Unknown spec: {}", other)),
    };

    match parse_optional::<PathBuf>(matches, SPEC_CONFIG_FLAG)? {
        Some(path) => Config::from_file_with_base(&path, &Config::from_chain_spec(&preset))
            .map(|config| config.apply_to_chain_spec(&preset)),
        None => Ok(preset),
    }
}

fn run(matches: &ArgMatches, log: &Logger) -> Result<(), String> {
    let network_config = parse_optional::<PathBuf>(matches, TESTNET_DIR_FLAG)?
        .map(|testnet_dir| {
            Eth2NetworkConfig::load(testnet_dir.clone()).map_err(|e| {
                format!(
                    "Unable to open testnet dir at {}: {}",
                    testnet_dir.display(),
                    e
                )
            })
        })
        .transpose()?;

    let spec = get_chain_spec(matches, network_config.as_ref())?;
    debug!(log, "Using chain spec"; "slots_per_epoch" => spec.slots_per_epoch);

    match matches.subcommand() {
        Some((process_header::CMD, matches)) => {
            process_header::run(network_config.as_ref(), &spec, matches, log)
                .map_err(|e| format!("Failed to process header: {}", e))
        }
        Some((check_wss_checkpoint::CMD, matches)) => check_wss_checkpoint::run(matches, log)
            .map_err(|e| format!("Failed to run check-wss-checkpoint command: {}", e)),
        Some((list_boot_nodes::CMD, matches)) => {
            list_boot_nodes::run(network_config.as_ref(), matches, log)
                .map_err(|e| format!("Failed to run list-boot-nodes command: {}", e))
        }
        Some((scan_source_epochs::CMD, matches)) => scan_source_epochs::run(matches, log)
            .map_err(|e| format!("Failed to run scan-source-epochs command: {}", e)),
        Some((other, _)) => Err(format!("Unknown subcommand {}. See --help.", other)),
        _ => Err("No subcommand provided. See --help.".to_string()),
    }
}
