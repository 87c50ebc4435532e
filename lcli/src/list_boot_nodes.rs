use clap::{Arg, ArgAction, ArgMatches, Command};
use eth2_network_config::{BootNodes, Eth2NetworkConfig};
use slog::{info, Logger};

pub const CMD: &str = "list-boot-nodes";

pub fn cli_app() -> Command {
    Command::new(CMD)
        .about(
            "Prints one boot node address per line, expanding any entries that name a .yaml \
            file into the addresses listed in that file.",
        )
        .arg(
            Arg::new("boot-nodes")
                .long("boot-nodes")
                .value_name("ADDRS")
                .action(ArgAction::Set)
                .help(
                    "Comma-separated boot node addresses or .yaml files. Defaults to the boot \
                    nodes of --testnet-dir.",
                )
                .display_order(0),
        )
}

pub fn boot_nodes(
    network_config: Option<&Eth2NetworkConfig>,
    matches: &ArgMatches,
) -> Result<BootNodes, String> {
    if let Some(value) = matches.get_one::<String>("boot-nodes") {
        BootNodes::from_cli_string(value)
    } else {
        network_config
            .and_then(|config| config.boot_nodes.clone())
            .map(BootNodes::from)
            .ok_or_else(|| "No --boot-nodes supplied and none in --testnet-dir".to_string())
    }
}

pub fn run(
    network_config: Option<&Eth2NetworkConfig>,
    matches: &ArgMatches,
    log: &Logger,
) -> Result<(), String> {
    let boot_nodes = boot_nodes(network_config, matches)?;
    info!(log, "Loaded boot nodes"; "count" => boot_nodes.len());

    for addr in boot_nodes.iter() {
        println!("{}", addr);
    }

    Ok(())
}
