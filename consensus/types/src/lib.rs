//! Types for the parts of the Ethereum consensus layer that block-header admission touches.
//!
//! Every type is SSZ-encodable and tree-hashable exactly as on the wire, so that roots computed
//! here agree byte-for-byte with every other client.

#[macro_use]
pub mod test_utils;
#[macro_use]
mod slot_epoch_macros;

pub mod beacon_block;
pub mod beacon_block_body;
pub mod beacon_block_header;
pub mod beacon_state;
pub mod chain_spec;
pub mod checkpoint;
pub mod eth1_data;
pub mod fork;
pub mod fork_data;
pub mod signed_beacon_block;
pub mod signed_beacon_block_header;
pub mod signing_data;
pub mod slot_epoch;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod validator;

use ethereum_types::H256;

pub use crate::beacon_block::BeaconBlock;
pub use crate::beacon_block_body::BeaconBlockBody;
pub use crate::beacon_block_header::BeaconBlockHeader;
pub use crate::beacon_state::{BeaconState, Error as BeaconStateError};
pub use crate::chain_spec::{ChainSpec, Config, Domain};
pub use crate::checkpoint::Checkpoint;
pub use crate::eth1_data::Eth1Data;
pub use crate::fork::Fork;
pub use crate::fork_data::ForkData;
pub use crate::signed_beacon_block::SignedBeaconBlock;
pub use crate::signed_beacon_block_header::SignedBeaconBlockHeader;
pub use crate::signing_data::{SignedRoot, SigningData};
pub use crate::slot_epoch::{Epoch, Slot};
pub use crate::validator::Validator;

pub type Hash256 = H256;

pub use bls::{
    AggregatePublicKey, AggregateSignature, Keypair, PublicKey, PublicKeyBytes, SecretKey,
    Signature, SignatureSet,
};
