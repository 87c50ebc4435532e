//! Admission of beacon block headers into a `BeaconState`.
//!
//! The state is only ever read and written through `ChainStateAccessor`, and the expected
//! proposer is supplied by a `ProposerOracle`, so callers with their own state representation
//! (or a cached shuffling) can reuse the same checks.

// Clippy lint set-up (disabled in tests)
#![cfg_attr(
    not(test),
    deny(
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::let_underscore_must_use
    )
)]

#[macro_use]
mod macros;

pub mod chain_state;
pub mod per_block_processing;

pub use chain_state::{ChainStateAccessor, ProposerOracle, StateProposerOracle};
pub use per_block_processing::{
    block_signature_verifier,
    errors::{BlockOperationError, HeaderError, HeaderInvalid},
    per_block_header_processing, process_block_header, process_signed_block_header,
    signature_sets, verify_block_header, verify_block_signature, ProposalSignatureVerifier,
    VerifySignatures,
};
