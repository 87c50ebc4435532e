//! Helpers for reading typed values out of `clap::ArgMatches`.

use clap::ArgMatches;
use std::str::FromStr;
use types::Hash256;

pub mod flags;

pub const FLAG_HEADER: &str = "Flags";

/// Parses `name` with `FromStr`, returning `Ok(None)` if the argument was not supplied.
pub fn parse_optional<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    matches
        .get_one::<String>(name)
        .map(|val| {
            val.parse()
                .map_err(|e| format!("Unable to parse {}: {}", name, e))
        })
        .transpose()
}

/// Parses `name` with `FromStr`, erroring if the argument was not supplied.
pub fn parse_required<T>(matches: &ArgMatches, name: &str) -> Result<T, String>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    parse_optional(matches, name)?.ok_or_else(|| format!("{} not specified", name))
}

/// Parses a `0x`-prefixed (or bare) hex string into a `Hash256`, if `name` was supplied.
pub fn parse_optional_hash256(matches: &ArgMatches, name: &str) -> Result<Option<Hash256>, String> {
    matches
        .get_one::<String>(name)
        .map(|val| {
            let bytes = hex::decode(val.strip_prefix("0x").unwrap_or(val))
                .map_err(|e| format!("Unable to parse {} as hex: {:?}", name, e))?;
            if bytes.len() == Hash256::len_bytes() {
                Ok(Hash256::from_slice(&bytes))
            } else {
                Err(format!(
                    "{} must be {} bytes, got {}",
                    name,
                    Hash256::len_bytes(),
                    bytes.len()
                ))
            }
        })
        .transpose()
}
