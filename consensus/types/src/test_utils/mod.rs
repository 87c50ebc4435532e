//! Helpers for building deterministic states and keys in tests, here and in downstream crates.

#[macro_use]
mod macros;
mod beacon_state_builder;
mod generate_deterministic_keypairs;

pub use beacon_state_builder::BeaconStateBuilder;
pub use generate_deterministic_keypairs::{
    generate_deterministic_keypair, generate_deterministic_keypairs,
};
