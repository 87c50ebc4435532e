//! Network-level configuration supplied by operators: the chain spec overrides, genesis state,
//! boot nodes and an optional weak subjectivity checkpoint.
//!
//! A network directory holds up to three files:
//!
//! - `config.yaml`: a `types::Config` (required).
//! - `boot_nodes.yaml`: a YAML list of boot node addresses (optional).
//! - `genesis.ssz`: the SSZ-encoded genesis `BeaconState` (optional).

mod boot_nodes;
mod weak_subjectivity;

pub use boot_nodes::{
    load_boot_nodes, read_boot_nodes_file, BootNodes, BOOT_NODES_FILE_EXTENSION,
};
pub use weak_subjectivity::{Error as WeakSubjectivityError, WeakSubjectivityCheckpoint};

use ssz::Decode;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::PathBuf;
use types::{BeaconState, ChainSpec, Config};

pub const BOOT_NODES_FILE: &str = "boot_nodes.yaml";
pub const GENESIS_STATE_FILE: &str = "genesis.ssz";
pub const BASE_CONFIG_FILE: &str = "config.yaml";

/// Specifies an Eth2 network, as read from or written to a network directory.
#[derive(Clone, PartialEq, Debug)]
pub struct Eth2NetworkConfig {
    pub boot_nodes: Option<Vec<String>>,
    pub genesis_state_bytes: Option<Vec<u8>>,
    pub config: Config,
}

impl Eth2NetworkConfig {
    /// The `ChainSpec` for this network: the mainnet preset with `self.config` applied.
    pub fn chain_spec(&self) -> ChainSpec {
        self.config.apply_to_chain_spec(&ChainSpec::mainnet())
    }

    /// Returns `true` if this configuration contains a `BeaconState`.
    pub fn beacon_state_is_known(&self) -> bool {
        self.genesis_state_bytes.is_some()
    }

    /// Attempts to deserialize `self.genesis_state_bytes`.
    pub fn beacon_state(&self) -> Result<BeaconState, String> {
        let genesis_state_bytes = self
            .genesis_state_bytes
            .as_ref()
            .ok_or("Genesis state is unknown")?;

        BeaconState::from_ssz_bytes(genesis_state_bytes)
            .map_err(|e| format!("Genesis state SSZ bytes are invalid: {:?}", e))
    }

    /// Write the files to the directory.
    ///
    /// Overwrites files if specified to do so.
    pub fn write_to_file(&self, base_dir: PathBuf, overwrite: bool) -> Result<(), String> {
        if base_dir.exists() && !overwrite {
            return Err("Network directory already exists".to_string());
        }

        self.force_write_to_file(base_dir)
    }

    /// Write the files to the directory, even if the directory already exists.
    pub fn force_write_to_file(&self, base_dir: PathBuf) -> Result<(), String> {
        create_dir_all(&base_dir)
            .map_err(|e| format!("Unable to create network directory: {:?}", e))?;

        macro_rules! write_to_yaml_file {
            ($file: ident, $variable: expr) => {
                File::create(base_dir.join($file))
                    .map_err(|e| format!("Unable to create {}: {:?}", $file, e))
                    .and_then(|mut file| {
                        let yaml = serde_yaml::to_string(&$variable)
                            .map_err(|e| format!("Unable to YAML encode {}: {:?}", $file, e))?;
                        let yaml = yaml.strip_prefix("---\n").unwrap_or(&yaml);

                        file.write_all(yaml.as_bytes())
                            .map_err(|e| format!("Unable to write {}: {:?}", $file, e))
                    })?;
            };
        }

        if let Some(boot_nodes) = &self.boot_nodes {
            write_to_yaml_file!(BOOT_NODES_FILE, boot_nodes);
        }

        write_to_yaml_file!(BASE_CONFIG_FILE, &self.config);

        // The genesis state is SSZ, not YAML.
        if let Some(genesis_state_bytes) = &self.genesis_state_bytes {
            let file = base_dir.join(GENESIS_STATE_FILE);

            File::create(&file)
                .and_then(|mut f| f.write_all(genesis_state_bytes))
                .map_err(|e| format!("Unable to write {:?}: {:?}", file, e))?;
        }

        Ok(())
    }

    pub fn load(base_dir: PathBuf) -> Result<Self, String> {
        let config = Config::from_file(&base_dir.join(BASE_CONFIG_FILE))?;

        let boot_nodes_path = base_dir.join(BOOT_NODES_FILE);
        let boot_nodes = if boot_nodes_path.exists() {
            Some(read_boot_nodes_file(&boot_nodes_path)?)
        } else {
            None
        };

        let genesis_file_path = base_dir.join(GENESIS_STATE_FILE);
        let genesis_state_bytes = if genesis_file_path.exists() {
            let mut bytes = vec![];
            File::open(&genesis_file_path)
                .and_then(|mut file| file.read_to_end(&mut bytes))
                .map_err(|e| format!("Unable to read {:?}: {:?}", genesis_file_path, e))?;

            Some(bytes).filter(|bytes| !bytes.is_empty())
        } else {
            None
        };

        Ok(Self {
            boot_nodes,
            genesis_state_bytes,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssz::Encode;
    use tempfile::Builder as TempBuilder;
    use types::test_utils::BeaconStateBuilder;

    #[test]
    fn round_trip() {
        let spec = ChainSpec::minimal();
        let state = BeaconStateBuilder::new(4, &spec).build();

        let network = Eth2NetworkConfig {
            boot_nodes: Some(vec!["enr:-a".to_string(), "enr:-b".to_string()]),
            genesis_state_bytes: Some(state.as_ssz_bytes()),
            config: Config::from_chain_spec(&spec),
        };

        let temp_dir = TempBuilder::new()
            .prefix("eth2_network_config")
            .tempdir()
            .unwrap();
        let base_dir = temp_dir.path().join("my_network");

        network.write_to_file(base_dir.clone(), false).unwrap();
        assert!(network.write_to_file(base_dir.clone(), false).is_err());

        let decoded = Eth2NetworkConfig::load(base_dir).unwrap();
        assert_eq!(decoded, network);
        assert_eq!(decoded.chain_spec(), spec);
        assert_eq!(decoded.beacon_state(), Ok(state));
    }

    #[test]
    fn optional_files_may_be_absent() {
        let network = Eth2NetworkConfig {
            boot_nodes: None,
            genesis_state_bytes: None,
            config: Config::default(),
        };

        let temp_dir = TempBuilder::new()
            .prefix("eth2_network_config")
            .tempdir()
            .unwrap();
        network
            .force_write_to_file(temp_dir.path().to_path_buf())
            .unwrap();

        let decoded = Eth2NetworkConfig::load(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(decoded, network);
        assert!(!decoded.beacon_state_is_known());
        assert!(decoded.beacon_state().is_err());
        assert_eq!(decoded.chain_spec(), ChainSpec::mainnet());
    }
}
