use crate::object_file::{load_object, write_object};
use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_utils::{parse_optional, parse_optional_hash256, parse_required, FLAG_HEADER};
use eth2_network_config::Eth2NetworkConfig;
use slog::{info, Logger};
use state_processing::{per_block_header_processing, StateProposerOracle, VerifySignatures};
use std::path::PathBuf;
use std::time::Instant;
use types::{BeaconState, ChainSpec, SignedBeaconBlock};

pub const CMD: &str = "process-header";

pub fn cli_app() -> Command {
    Command::new(CMD)
        .about(
            "Admits the header of a signed block into a pre-state and writes the post-state. \
            Files ending in .yaml or .yml are read and written as YAML, all others as SSZ.",
        )
        .arg(
            Arg::new("pre-state")
                .long("pre-state")
                .value_name("PATH")
                .action(ArgAction::Set)
                .help(
                    "Path to load a BeaconState from. Defaults to the genesis state of \
                    --testnet-dir, if it has one.",
                )
                .display_order(0),
        )
        .arg(
            Arg::new("block")
                .long("block")
                .value_name("PATH")
                .action(ArgAction::Set)
                .required(true)
                .help("Path to load a SignedBeaconBlock from.")
                .display_order(0),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("PATH")
                .action(ArgAction::Set)
                .required(true)
                .help("Path to write the post-state to.")
                .display_order(0),
        )
        .arg(
            Arg::new("block-root")
                .long("block-root")
                .value_name("HASH256")
                .action(ArgAction::Set)
                .help("Tree hash root of the provided block, to avoid computing it.")
                .display_order(0),
        )
        .arg(
            Arg::new("no-signature-verification")
                .long("no-signature-verification")
                .action(ArgAction::SetTrue)
                .help_heading(FLAG_HEADER)
                .help("Do not verify the proposer's signature.")
                .display_order(0),
        )
}

pub fn run(
    network_config: Option<&Eth2NetworkConfig>,
    spec: &ChainSpec,
    matches: &ArgMatches,
    log: &Logger,
) -> Result<(), String> {
    let pre_state_path: Option<PathBuf> = parse_optional(matches, "pre-state")?;
    let block_path: PathBuf = parse_required(matches, "block")?;
    let output_path: PathBuf = parse_required(matches, "output")?;
    let block_root = parse_optional_hash256(matches, "block-root")?;
    let verify_signatures = if matches.get_flag("no-signature-verification") {
        VerifySignatures::False
    } else {
        VerifySignatures::True
    };

    let mut state: BeaconState = match pre_state_path {
        Some(path) => {
            info!(log, "Loading pre-state"; "path" => ?path);
            load_object(&path)?
        }
        None => network_config
            .filter(|config| config.beacon_state_is_known())
            .ok_or("No --pre-state supplied and no genesis state in --testnet-dir")?
            .beacon_state()?,
    };

    info!(log, "Loading block"; "path" => ?block_path);
    let block: SignedBeaconBlock =
        load_object(&block_path).map_err(|e| format!("No usable block: {}", e))?;

    let t = Instant::now();
    let proposer_index = per_block_header_processing(
        &mut state,
        &StateProposerOracle,
        &block,
        block_root,
        verify_signatures,
        spec,
    )
    .map_err(|e| {
        if e.is_internal() {
            format!("Unable to process block header: {:?}", e)
        } else {
            format!("Invalid block header: {:?}", e)
        }
    })?;

    info!(
        log,
        "Block header admitted";
        "slot" => %block.slot(),
        "proposer_index" => proposer_index,
        "verify_signatures" => verify_signatures.is_true(),
        "elapsed" => ?t.elapsed(),
    );

    write_object(&output_path, &state)?;
    info!(log, "Wrote post-state"; "path" => ?output_path);

    Ok(())
}
