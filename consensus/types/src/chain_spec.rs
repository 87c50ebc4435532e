use crate::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tree_hash::TreeHash;

/// Each of the BLS signature domains.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Domain {
    BeaconProposer,
}

/// Holds all the "constants" for a beacon chain.
///
/// Passed explicitly to every function that needs one; there is no global instance.
#[derive(PartialEq, Debug, Clone)]
pub struct ChainSpec {
    /*
     * Constants
     */
    pub far_future_epoch: Epoch,
    pub zero_hash: Hash256,

    /*
     * Misc
     */
    pub shuffle_round_count: u8,

    /*
     * Gwei values
     */
    pub max_effective_balance: u64,

    /*
     * Time parameters
     */
    pub slots_per_epoch: u64,
    pub min_seed_lookahead: Epoch,

    /*
     * State list lengths
     */
    pub epochs_per_historical_vector: u64,

    /*
     * Initial values
     */
    pub genesis_fork_version: [u8; 4],

    /*
     * Signature domains
     */
    pub(crate) domain_beacon_proposer: u32,
}

impl ChainSpec {
    /// Returns the 4-byte domain type for `domain`.
    pub fn get_domain_constant(&self, domain: Domain) -> u32 {
        match domain {
            Domain::BeaconProposer => self.domain_beacon_proposer,
        }
    }

    /// Get the domain that represents the fork meta and signature domain.
    pub fn get_domain(
        &self,
        epoch: Epoch,
        domain: Domain,
        fork: &Fork,
        genesis_validators_root: Hash256,
    ) -> Hash256 {
        let fork_version = fork.get_fork_version(epoch);
        self.compute_domain(domain, fork_version, genesis_validators_root)
    }

    /// Compute a domain by applying the given `fork_version`.
    pub fn compute_domain(
        &self,
        domain: Domain,
        fork_version: [u8; 4],
        genesis_validators_root: Hash256,
    ) -> Hash256 {
        let domain_constant = self.get_domain_constant(domain);

        let mut domain = [0; 32];
        domain[0..4].copy_from_slice(&domain_constant.to_le_bytes());
        let fork_data_root = Self::compute_fork_data_root(fork_version, genesis_validators_root);
        domain[4..].copy_from_slice(&fork_data_root.as_bytes()[..28]);

        Hash256::from(domain)
    }

    /// Return the 32-byte fork data root for the `current_version` and `genesis_validators_root`.
    ///
    /// This is used primarily in signature domains to avoid collisions across forks/chains.
    pub fn compute_fork_data_root(
        current_version: [u8; 4],
        genesis_validators_root: Hash256,
    ) -> Hash256 {
        ForkData {
            current_version,
            genesis_validators_root,
        }
        .tree_hash_root()
    }

    /// Returns a `ChainSpec` compatible with the Ethereum mainnet.
    pub fn mainnet() -> Self {
        Self {
            far_future_epoch: Epoch::new(u64::MAX),
            zero_hash: Hash256::zero(),
            shuffle_round_count: 90,
            max_effective_balance: 32_000_000_000,
            slots_per_epoch: 32,
            min_seed_lookahead: Epoch::new(1),
            epochs_per_historical_vector: 65_536,
            genesis_fork_version: [0; 4],
            domain_beacon_proposer: 0,
        }
    }

    /// Ethereum Foundation minimal spec, as defined in the consensus-specs repo.
    pub fn minimal() -> Self {
        Self {
            shuffle_round_count: 10,
            slots_per_epoch: 8,
            epochs_per_historical_vector: 64,
            genesis_fork_version: [0x00, 0x00, 0x00, 0x01],
            ..ChainSpec::mainnet()
        }
    }

    /// Loads a YAML config from `path` and applies it on top of the mainnet preset.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        Config::from_file(path).map(|config| config.apply_to_chain_spec(&ChainSpec::mainnet()))
    }
}

impl Default for ChainSpec {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// The YAML representation of the configurable parts of a `ChainSpec`.
///
/// Every key is optional. `from_file` fills absent keys with their mainnet value and
/// `from_file_with_base` fills them from a caller-supplied config.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(rename_all = "UPPERCASE", default)]
pub struct Config {
    #[serde(with = "serde_utils::quoted_u8")]
    shuffle_round_count: u8,
    #[serde(with = "serde_utils::quoted_u64")]
    max_effective_balance: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    slots_per_epoch: u64,
    min_seed_lookahead: Epoch,
    #[serde(with = "serde_utils::quoted_u64")]
    epochs_per_historical_vector: u64,
    #[serde(with = "serde_utils::bytes_4_hex")]
    genesis_fork_version: [u8; 4],
    #[serde(with = "serde_utils::u32_hex")]
    domain_beacon_proposer: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config::from_chain_spec(&ChainSpec::mainnet())
    }
}

impl Config {
    pub fn from_chain_spec(spec: &ChainSpec) -> Self {
        Self {
            shuffle_round_count: spec.shuffle_round_count,
            max_effective_balance: spec.max_effective_balance,
            slots_per_epoch: spec.slots_per_epoch,
            min_seed_lookahead: spec.min_seed_lookahead,
            epochs_per_historical_vector: spec.epochs_per_historical_vector,
            genesis_fork_version: spec.genesis_fork_version,
            domain_beacon_proposer: spec.domain_beacon_proposer,
        }
    }

    pub fn from_file(filename: &Path) -> Result<Self, String> {
        Self::from_file_with_base(filename, &Config::default())
    }

    /// Reads a partial config from `filename`, taking every key it omits from `base`.
    pub fn from_file_with_base(filename: &Path, base: &Config) -> Result<Self, String> {
        let contents = fs::read_to_string(filename)
            .map_err(|e| format!("Error opening spec at {}: {:?}", filename.display(), e))?;
        let overrides: serde_yaml::Value = if contents.trim().is_empty() {
            serde_yaml::Value::Null
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| format!("Error parsing spec at {}: {:?}", filename.display(), e))?
        };

        let mut merged = serde_yaml::to_value(base)
            .map_err(|e| format!("Unable to encode base config: {:?}", e))?;
        match (&mut merged, overrides) {
            (_, serde_yaml::Value::Null) => (),
            (serde_yaml::Value::Mapping(merged), serde_yaml::Value::Mapping(overrides)) => {
                merged.extend(overrides)
            }
            _ => {
                return Err(format!(
                    "Error parsing spec at {}: expected a mapping",
                    filename.display()
                ))
            }
        }

        serde_yaml::from_value(merged)
            .map_err(|e| format!("Error parsing spec at {}: {:?}", filename.display(), e))
    }

    /// Overwrites every configurable field of `base` with the value in `self`.
    pub fn apply_to_chain_spec(&self, base: &ChainSpec) -> ChainSpec {
        ChainSpec {
            shuffle_round_count: self.shuffle_round_count,
            max_effective_balance: self.max_effective_balance,
            slots_per_epoch: self.slots_per_epoch,
            min_seed_lookahead: self.min_seed_lookahead,
            epochs_per_historical_vector: self.epochs_per_historical_vector,
            genesis_fork_version: self.genesis_fork_version,
            domain_beacon_proposer: self.domain_beacon_proposer,
            ..base.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn mainnet_spec_can_be_constructed() {
        let _ = ChainSpec::mainnet();
    }

    #[test]
    fn compute_domain_layout() {
        let spec = ChainSpec::mainnet();
        let genesis_validators_root = Hash256::repeat_byte(0xaa);
        let fork_version = [1, 2, 3, 4];

        let domain = spec.compute_domain(
            Domain::BeaconProposer,
            fork_version,
            genesis_validators_root,
        );
        let fork_data_root =
            ChainSpec::compute_fork_data_root(fork_version, genesis_validators_root);

        assert_eq!(&domain[0..4], &spec.domain_beacon_proposer.to_le_bytes());
        assert_eq!(&domain[4..], &fork_data_root[..28]);
    }

    #[test]
    fn get_domain_follows_fork_epoch() {
        let spec = ChainSpec::mainnet();
        let gvr = Hash256::zero();
        let fork = Fork {
            previous_version: [0; 4],
            current_version: [1; 4],
            epoch: Epoch::new(10),
        };

        assert_eq!(
            spec.get_domain(Epoch::new(9), Domain::BeaconProposer, &fork, gvr),
            spec.compute_domain(Domain::BeaconProposer, [0; 4], gvr)
        );
        assert_eq!(
            spec.get_domain(Epoch::new(10), Domain::BeaconProposer, &fork, gvr),
            spec.compute_domain(Domain::BeaconProposer, [1; 4], gvr)
        );
    }

    #[test]
    fn empty_config_is_mainnet() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(
            config.apply_to_chain_spec(&ChainSpec::minimal()),
            ChainSpec::mainnet()
        );
    }

    #[test]
    fn partial_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "SLOTS_PER_EPOCH: 8\nGENESIS_FORK_VERSION: 0x00000001\nSHUFFLE_ROUND_COUNT: 10"
        )
        .unwrap();

        let spec = ChainSpec::from_file(file.path()).unwrap();
        assert_eq!(spec.slots_per_epoch, 8);
        assert_eq!(spec.shuffle_round_count, 10);
        assert_eq!(spec.genesis_fork_version, [0, 0, 0, 1]);
        assert_eq!(
            spec.max_effective_balance,
            ChainSpec::mainnet().max_effective_balance
        );
    }

    #[test]
    fn partial_config_keeps_base_preset() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "SLOTS_PER_EPOCH: \"16\"").unwrap();

        let minimal = ChainSpec::minimal();
        let config =
            Config::from_file_with_base(file.path(), &Config::from_chain_spec(&minimal)).unwrap();
        let spec = config.apply_to_chain_spec(&minimal);

        assert_eq!(spec.slots_per_epoch, 16);
        assert_eq!(
            spec,
            ChainSpec {
                slots_per_epoch: 16,
                ..ChainSpec::minimal()
            }
        );
    }

    #[test]
    fn empty_file_is_the_base() {
        let file = NamedTempFile::new().unwrap();
        let base = Config::from_chain_spec(&ChainSpec::minimal());

        assert_eq!(Config::from_file_with_base(file.path(), &base), Ok(base));
    }

    #[test]
    fn non_mapping_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "- 1\n- 2").unwrap();

        assert!(Config::from_file(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ChainSpec::from_file(Path::new("/does/not/exist.yaml")).is_err());
    }
}
