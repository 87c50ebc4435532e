#![cfg(test)]

use crate::test_utils::*;
use crate::*;

#[test]
fn valid_empty_history() {
    StreamTest {
        cases: vec![Test::single(vote(2, 3))],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn valid_genesis() {
    StreamTest {
        cases: vec![Test::single(vote(0, 0))],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn valid_out_of_order_attestation() {
    StreamTest {
        cases: vec![
            Test::single(vote(0, 3)),
            Test::single(vote(2, 5)),
            Test::single(vote(1, 4)),
        ],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn valid_repeat_attestation() {
    StreamTest {
        cases: vec![
            Test::single(vote(0, 1)),
            Test::single(vote(0, 1)).expect_same_data(),
        ],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn valid_source_from_first_entry() {
    StreamTest {
        cases: vec![Test::single(vote(6, 7)), Test::single(vote(6, 8))],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn valid_multiple_validators_double_vote() {
    StreamTest {
        registered_validators: vec![pubkey(0), pubkey(1)],
        cases: vec![
            Test::with_pubkey(pubkey(0), vote(0, 1)),
            Test::with_pubkey(pubkey(1), vote(0, 1).with_signing_root(1)),
        ],
    }
    .run()
}

#[test]
fn valid_vote_chain_repeat_first() {
    StreamTest {
        cases: vec![
            Test::single(vote(0, 1)),
            Test::single(vote(1, 2)),
            Test::single(vote(2, 3)),
            Test::single(vote(0, 1)).expect_same_data(),
        ],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn invalid_double_vote_diff_source() {
    let first = vote(0, 2);
    StreamTest {
        cases: vec![
            Test::single(first),
            Test::single(vote(1, 2).with_signing_root(1))
                .expect_invalid_att(InvalidAttestation::DoubleVote(first.as_signed())),
        ],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn invalid_double_vote_diff_signing_root() {
    let first = vote(0, 2);
    StreamTest {
        cases: vec![
            Test::single(first),
            Test::single(first.with_signing_root(7))
                .expect_invalid_att(InvalidAttestation::DoubleVote(first.as_signed())),
        ],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn invalid_surrounding_single() {
    let first = vote(2, 3);
    StreamTest {
        cases: vec![
            Test::single(first),
            Test::single(vote(1, 4)).expect_invalid_att(InvalidAttestation::NewSurroundsPrev {
                prev: first.as_signed(),
            }),
        ],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn invalid_surrounding_from_first_source() {
    let second = vote(3, 4);
    StreamTest {
        cases: vec![
            Test::single(vote(2, 3)),
            Test::single(second),
            Test::single(vote(2, 5)).expect_invalid_att(InvalidAttestation::NewSurroundsPrev {
                prev: second.as_signed(),
            }),
        ],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn invalid_surrounding_multiple_votes() {
    let third = vote(2, 3);
    StreamTest {
        cases: vec![
            Test::single(vote(0, 1)),
            Test::single(vote(1, 2)),
            Test::single(third),
            Test::single(vote(0, 4)).expect_invalid_att(InvalidAttestation::NewSurroundsPrev {
                prev: third.as_signed(),
            }),
        ],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn invalid_prev_surrounds_new() {
    let first = vote(0, 7);
    StreamTest {
        cases: vec![
            Test::single(first),
            Test::single(vote(1, 6)).expect_invalid_att(InvalidAttestation::PrevSurroundsNew {
                prev: first.as_signed(),
            }),
        ],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn invalid_source_exceeds_target() {
    StreamTest {
        cases: vec![
            Test::single(vote(2, 1)).expect_invalid_att(InvalidAttestation::SourceExceedsTarget)
        ],
        ..StreamTest::default()
    }
    .run()
}

#[test]
fn invalid_unregistered_validator() {
    StreamTest {
        registered_validators: vec![],
        cases: vec![Test::single(vote(0, 1))
            .expect_result(Err(NotSafe::UnregisteredValidator(pubkey(0))))],
    }
    .run()
}

#[test]
fn double_register_is_a_noop() {
    StreamTest {
        registered_validators: vec![pubkey(0), pubkey(0)],
        cases: vec![
            Test::single(vote(0, 1)),
            Test::single(vote(0, 1).with_signing_root(1))
                .expect_invalid_att(InvalidAttestation::DoubleVote(vote(0, 1).as_signed())),
        ],
    }
    .run()
}
