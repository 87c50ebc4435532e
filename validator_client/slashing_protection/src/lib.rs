//! A per-validator record of signed attestations, kept in SQLite, used to refuse signing anything
//! slashable and to report the range of source epochs each validator has attested from.

mod attestation_tests;
mod signed_attestation;
mod slashing_database;
mod test_utils;

pub use crate::signed_attestation::{InvalidAttestation, SignedAttestation};
pub use crate::slashing_database::{
    SlashingDatabase, SourceEpochBounds, SourceEpochReport, CONNECTION_TIMEOUT, POOL_SIZE,
};
use rusqlite::Error as SQLError;
use std::fmt;
use std::io::{Error as IOError, ErrorKind};
use types::{Hash256, PublicKeyBytes};

/// The attestation is not safe to sign, or the database could not be read.
///
/// This could be because it's slashable, or because an error occurred.
#[derive(PartialEq, Debug)]
pub enum NotSafe {
    UnregisteredValidator(PublicKeyBytes),
    InvalidAttestation(InvalidAttestation),
    IOError(ErrorKind),
    SQLError(String),
    SQLPoolError(String),
}

/// The attestation is safe to sign, and will not cause the signer to be slashed.
#[derive(PartialEq, Debug)]
pub enum Safe {
    /// Casting the exact same attestation twice is never slashable.
    SameData,
    /// Incoming data is safe from slashing, and is not a duplicate.
    Valid,
}

/// Safely parse a `Hash256` from the given `column` of an SQLite `row`.
fn hash256_from_row(column: usize, row: &rusqlite::Row) -> rusqlite::Result<Hash256> {
    use rusqlite::{types::Type, Error};

    let bytes: Vec<u8> = row.get(column)?;
    if bytes.len() == 32 {
        Ok(Hash256::from_slice(&bytes))
    } else {
        Err(Error::FromSqlConversionFailure(
            column,
            Type::Blob,
            Box::from(format!("Invalid length for Hash256: {}", bytes.len())),
        ))
    }
}

impl From<IOError> for NotSafe {
    fn from(error: IOError) -> NotSafe {
        NotSafe::IOError(error.kind())
    }
}

impl From<SQLError> for NotSafe {
    fn from(error: SQLError) -> NotSafe {
        NotSafe::SQLError(error.to_string())
    }
}

impl From<r2d2::Error> for NotSafe {
    fn from(error: r2d2::Error) -> Self {
        NotSafe::SQLPoolError(format!("{:?}", error))
    }
}

impl fmt::Display for NotSafe {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
