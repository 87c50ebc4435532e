use crate::{PublicKey, SecretKey};
use std::fmt;

/// A secret key and its public key.
#[derive(Clone)]
pub struct Keypair {
    pub pk: PublicKey,
    pub sk: SecretKey,
}

impl Keypair {
    /// Instantiate `Self` from a public and secret key.
    ///
    /// This function does not check that `pk` corresponds to `sk`.
    pub fn from_components(pk: PublicKey, sk: SecretKey) -> Self {
        Self { pk, sk }
    }

    /// Instantiates `Self` from a randomly generated secret key.
    pub fn random() -> Self {
        let sk = SecretKey::random();
        Self {
            pk: sk.public_key(),
            sk,
        }
    }
}

impl fmt::Debug for Keypair {
    /// Defers to `self.pk` to avoid leaking the secret key.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.pk.fmt(f)
    }
}
