use std::fmt;
use std::str::FromStr;
use types::{Checkpoint, Epoch, Hash256};

const SEPARATOR: char = ':';
const BLOCK_ROOT_LEN: usize = 32;

#[derive(Debug, PartialEq, Clone)]
pub enum Error {
    /// The input has no `:` between the block root and the epoch.
    MissingSeparator(String),
    /// The input has more than one `:`.
    TooManySeparators(String),
    /// The block root is not valid hex.
    InvalidHex(String),
    /// The block root decoded to the wrong number of bytes.
    InvalidRootLength { got: usize, expected: usize },
    /// The epoch is not a base-10 `u64`.
    InvalidEpoch(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingSeparator(input) => {
                write!(f, "{} does not contain a `:` separator", input)
            }
            Error::TooManySeparators(input) => write!(
                f,
                "{} should be in `block_root:epoch_number` format",
                input
            ),
            Error::InvalidHex(e) => write!(f, "block root is not valid hex: {}", e),
            Error::InvalidRootLength { got, expected } => write!(
                f,
                "block root is {} bytes, expected {} bytes",
                got, expected
            ),
            Error::InvalidEpoch(e) => write!(f, "epoch is not a valid integer: {}", e),
        }
    }
}

/// A trusted `block_root:epoch` pair that the chain being synced must contain.
///
/// Parsed from the form `[0x]<64 hex chars>:<epoch>`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct WeakSubjectivityCheckpoint {
    pub block_root: Hash256,
    pub epoch: Epoch,
}

impl WeakSubjectivityCheckpoint {
    /// Parses `input`, treating the empty string as "no checkpoint configured".
    pub fn parse_optional(input: &str) -> Result<Option<Self>, Error> {
        if input.is_empty() {
            Ok(None)
        } else {
            input.parse().map(Some)
        }
    }
}

impl FromStr for WeakSubjectivityCheckpoint {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if !input.contains(SEPARATOR) {
            return Err(Error::MissingSeparator(input.to_string()));
        }

        let stripped = input.strip_prefix("0x").unwrap_or(input);
        let (root, epoch) = match stripped.split(SEPARATOR).collect::<Vec<_>>().as_slice() {
            [root, epoch] => (*root, *epoch),
            _ => return Err(Error::TooManySeparators(input.to_string())),
        };

        let root_bytes = hex::decode(root).map_err(|e| Error::InvalidHex(e.to_string()))?;
        if root_bytes.len() != BLOCK_ROOT_LEN {
            return Err(Error::InvalidRootLength {
                got: root_bytes.len(),
                expected: BLOCK_ROOT_LEN,
            });
        }

        let epoch = epoch
            .parse::<u64>()
            .map_err(|e| Error::InvalidEpoch(e.to_string()))?;

        Ok(Self {
            block_root: Hash256::from_slice(&root_bytes),
            epoch: Epoch::new(epoch),
        })
    }
}

impl fmt::Display for WeakSubjectivityCheckpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "0x{}{}{}",
            hex::encode(self.block_root.as_bytes()),
            SEPARATOR,
            self.epoch
        )
    }
}

impl From<WeakSubjectivityCheckpoint> for Checkpoint {
    fn from(wss: WeakSubjectivityCheckpoint) -> Checkpoint {
        Checkpoint {
            epoch: wss.epoch,
            root: wss.block_root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "0101010101010101010101010101010101010101010101010101010101010101";

    #[test]
    fn parse_with_and_without_prefix() {
        let expected = WeakSubjectivityCheckpoint {
            block_root: Hash256::repeat_byte(1),
            epoch: Epoch::new(1024),
        };

        assert_eq!(format!("0x{}:1024", ROOT).parse(), Ok(expected));
        assert_eq!(format!("{}:1024", ROOT).parse(), Ok(expected));
    }

    #[test]
    fn empty_input_is_none() {
        assert_eq!(WeakSubjectivityCheckpoint::parse_optional(""), Ok(None));
        assert!(WeakSubjectivityCheckpoint::parse_optional(&format!("{}:1", ROOT))
            .unwrap()
            .is_some());
    }

    #[test]
    fn missing_separator() {
        assert_eq!(
            ROOT.parse::<WeakSubjectivityCheckpoint>(),
            Err(Error::MissingSeparator(ROOT.to_string()))
        );
    }

    #[test]
    fn too_many_separators() {
        let input = format!("{}:1:2", ROOT);
        assert_eq!(
            input.parse::<WeakSubjectivityCheckpoint>(),
            Err(Error::TooManySeparators(input))
        );
    }

    #[test]
    fn bad_hex() {
        assert!(matches!(
            "0xzz:1".parse::<WeakSubjectivityCheckpoint>(),
            Err(Error::InvalidHex(_))
        ));
    }

    #[test]
    fn wrong_root_length() {
        assert_eq!(
            "0x0102:1".parse::<WeakSubjectivityCheckpoint>(),
            Err(Error::InvalidRootLength {
                got: 2,
                expected: 32
            })
        );
    }

    #[test]
    fn bad_epoch() {
        for epoch in ["", "-1", "ten", "18446744073709551616"] {
            assert!(matches!(
                format!("{}:{}", ROOT, epoch).parse::<WeakSubjectivityCheckpoint>(),
                Err(Error::InvalidEpoch(_))
            ));
        }
    }

    #[test]
    fn display_round_trip() {
        let wss: WeakSubjectivityCheckpoint = format!("{}:7", ROOT).parse().unwrap();
        assert_eq!(wss.to_string(), format!("0x{}:7", ROOT));
        assert_eq!(wss.to_string().parse(), Ok(wss));
    }

    #[test]
    fn into_checkpoint() {
        let wss: WeakSubjectivityCheckpoint = format!("{}:7", ROOT).parse().unwrap();
        let checkpoint: Checkpoint = wss.into();
        assert_eq!(checkpoint.root, Hash256::repeat_byte(1));
        assert_eq!(checkpoint.epoch, Epoch::new(7));
    }
}
