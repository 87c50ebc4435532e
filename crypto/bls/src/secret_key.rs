use crate::{Error, Hash256, PublicKey, Signature, ZeroizeHash, DST};
use blst::min_pk as blst_core;
use rand::RngCore;
use zeroize::Zeroize;

/// The byte-length of a BLS secret key.
pub const SECRET_KEY_BYTES_LEN: usize = 32;

/// A BLS secret key.
///
/// Deliberately does not implement `Debug`, `Display`, `Serialize` or `Encode`; the only way to
/// get bytes out is `Self::serialize`, which returns a zeroize-on-drop buffer.
#[derive(Clone)]
pub struct SecretKey {
    /// The underlying point which performs *actual* cryptographic operations.
    point: blst_core::SecretKey,
}

impl SecretKey {
    /// Instantiate `Self` from the operating system's secure source of entropy.
    pub fn random() -> Self {
        let mut ikm = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut ikm);
        let point = blst_core::SecretKey::key_gen(&ikm, &[])
            .expect("key_gen only fails for ikm shorter than 32 bytes");
        ikm.zeroize();
        Self { point }
    }

    /// Signs `msg`.
    pub fn sign(&self, msg: Hash256) -> Signature {
        Signature::from_point(self.point.sign(msg.as_bytes(), DST, &[]))
    }

    /// Returns the public key that corresponds to self.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_point(self.point.sk_to_pk())
    }

    /// Serialize `self` as big-endian bytes.
    ///
    /// ## Note
    ///
    /// The bytes that are returned are the unencrypted secret key. This is sensitive cryptographic
    /// material.
    pub fn serialize(&self) -> ZeroizeHash {
        self.point.to_bytes().into()
    }

    /// Deserialize `self` from big-endian bytes.
    ///
    /// Rejects anything other than 32 bytes, the zero scalar and scalars not less than the curve
    /// order.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SECRET_KEY_BYTES_LEN {
            Err(Error::InvalidSecretKeyLength {
                got: bytes.len(),
                expected: SECRET_KEY_BYTES_LEN,
            })
        } else if bytes.iter().all(|b| *b == 0) {
            Err(Error::InvalidZeroSecretKey)
        } else {
            Ok(Self {
                point: blst_core::SecretKey::from_bytes(bytes)?,
            })
        }
    }
}
