#![cfg(test)]

use crate::*;
use tempfile::tempdir;
use types::{test_utils::generate_deterministic_keypair, Epoch, Hash256, PublicKeyBytes};

pub const DEFAULT_VALIDATOR_INDEX: usize = 0;

pub fn pubkey(index: usize) -> PublicKeyBytes {
    generate_deterministic_keypair(index).pk.compress()
}

/// An attestation vote as stored in the database.
#[derive(Debug, Clone, Copy)]
pub struct Vote {
    pub source: Epoch,
    pub target: Epoch,
    pub signing_root: Hash256,
}

pub fn vote(source: u64, target: u64) -> Vote {
    Vote {
        source: Epoch::new(source),
        target: Epoch::new(target),
        signing_root: Hash256::zero(),
    }
}

impl Vote {
    pub fn with_signing_root(mut self, byte: u8) -> Self {
        self.signing_root = Hash256::repeat_byte(byte);
        self
    }

    pub fn as_signed(&self) -> SignedAttestation {
        SignedAttestation::new(self.source, self.target, self.signing_root)
    }
}

pub struct Test {
    pubkey: PublicKeyBytes,
    vote: Vote,
    expected: Result<Safe, NotSafe>,
}

impl Test {
    pub fn single(vote: Vote) -> Self {
        Self::with_pubkey(pubkey(DEFAULT_VALIDATOR_INDEX), vote)
    }

    pub fn with_pubkey(pubkey: PublicKeyBytes, vote: Vote) -> Self {
        Self {
            pubkey,
            vote,
            expected: Ok(Safe::Valid),
        }
    }

    pub fn expect_result(mut self, result: Result<Safe, NotSafe>) -> Self {
        self.expected = result;
        self
    }

    pub fn expect_invalid_att(self, error: InvalidAttestation) -> Self {
        self.expect_result(Err(NotSafe::InvalidAttestation(error)))
    }

    pub fn expect_same_data(self) -> Self {
        self.expect_result(Ok(Safe::SameData))
    }
}

pub struct StreamTest {
    /// Validators to register.
    pub registered_validators: Vec<PublicKeyBytes>,
    /// Vector of cases and the value expected when calling `record_attestation`.
    pub cases: Vec<Test>,
}

impl Default for StreamTest {
    fn default() -> Self {
        Self {
            registered_validators: vec![pubkey(DEFAULT_VALIDATOR_INDEX)],
            cases: vec![],
        }
    }
}

impl StreamTest {
    pub fn run(&self) {
        let dir = tempdir().unwrap();
        let slashing_db_file = dir.path().join("slashing_protection.sqlite");
        let slashing_db = SlashingDatabase::create(&slashing_db_file).unwrap();

        slashing_db
            .register_validators(self.registered_validators.iter())
            .unwrap();

        for (i, test) in self.cases.iter().enumerate() {
            assert_eq!(
                slashing_db.record_attestation(
                    &test.pubkey,
                    test.vote.source,
                    test.vote.target,
                    test.vote.signing_root
                ),
                test.expected,
                "attestation {} not processed as expected",
                i
            );
        }
    }
}
