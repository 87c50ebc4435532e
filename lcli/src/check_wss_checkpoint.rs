use clap::{Arg, ArgAction, ArgMatches, Command};
use eth2_network_config::WeakSubjectivityCheckpoint;
use slog::{info, Logger};

pub const CMD: &str = "check-wss-checkpoint";

pub fn cli_app() -> Command {
    Command::new(CMD)
        .about(
            "Parses a weak subjectivity checkpoint of the form block_root:epoch and prints it \
            in canonical form. An empty value means no checkpoint.",
        )
        .arg(
            Arg::new("checkpoint")
                .value_name("BLOCK_ROOT:EPOCH")
                .action(ArgAction::Set)
                .required(true)
                .help("The checkpoint, with the block root in hex (0x prefix optional).")
                .display_order(0),
        )
}

pub fn run(matches: &ArgMatches, log: &Logger) -> Result<(), String> {
    let input = matches
        .get_one::<String>("checkpoint")
        .map(String::as_str)
        .unwrap_or_default();

    match WeakSubjectivityCheckpoint::parse_optional(input)
        .map_err(|e| format!("Invalid weak subjectivity checkpoint: {}", e))?
    {
        Some(checkpoint) => {
            info!(
                log,
                "Valid weak subjectivity checkpoint";
                "block_root" => ?checkpoint.block_root,
                "epoch" => %checkpoint.epoch,
            );
            println!("{}", checkpoint);
        }
        None => {
            info!(log, "No weak subjectivity checkpoint supplied");
            println!("none");
        }
    }

    Ok(())
}
