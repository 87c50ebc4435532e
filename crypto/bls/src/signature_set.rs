use crate::{Error, Hash256, PublicKey, Signature, DST};
use blst::min_pk as blst_core;
use blst::{blst_scalar, BLST_ERROR};
use rand::Rng;
use std::borrow::Cow;

/// The number of random bits in each blinding scalar used for batch verification.
const RAND_BITS: usize = 64;

/// A signature across a message by one or more public keys.
///
/// This struct is primarily useful in a collection (e.g., `Vec<SignatureSet>`) so we can perform
/// multiple-signature verification which is much faster than verifying each signature
/// individually.
#[derive(Clone)]
pub struct SignatureSet<'a> {
    pub signature: Cow<'a, Signature>,
    pub signing_keys: Vec<Cow<'a, PublicKey>>,
    pub message: Hash256,
}

impl<'a> SignatureSet<'a> {
    /// Instantiates `Self` with a single public key.
    pub fn single_pubkey(
        signature: &'a Signature,
        signing_key: Cow<'a, PublicKey>,
        message: Hash256,
    ) -> Self {
        Self {
            signature: Cow::Borrowed(signature),
            signing_keys: vec![signing_key],
            message,
        }
    }

    /// Instantiates `Self` with multiple public keys which all signed `message`.
    pub fn multiple_pubkeys(
        signature: &'a Signature,
        signing_keys: Vec<Cow<'a, PublicKey>>,
        message: Hash256,
    ) -> Self {
        Self {
            signature: Cow::Borrowed(signature),
            signing_keys,
            message,
        }
    }

    /// Returns `true` if `self.signature` is a signature across `self.message` by
    /// `self.signing_keys`.
    pub fn verify(&self) -> bool {
        match self.signing_key() {
            Some(pk) => self.signature.verify(&pk, self.message),
            None => false,
        }
    }

    /// Sums the signing keys into the single key the signature is checked against.
    fn signing_key(&self) -> Option<PublicKey> {
        match self.signing_keys.as_slice() {
            [] => None,
            [pk] => Some(pk.as_ref().clone()),
            keys => {
                let refs = keys.iter().map(|pk| pk.as_ref()).collect::<Vec<_>>();
                crate::AggregatePublicKey::aggregate(&refs)
                    .and_then(|agg| agg.to_public_key())
                    .ok()
            }
        }
    }
}

/// Produces a non-zero scalar with `RAND_BITS` bits of randomness.
fn random_scalar<R: Rng>(rng: &mut R) -> blst_scalar {
    let mut value: u64 = 0;
    while value == 0 {
        value = rng.gen();
    }
    let mut b = [0u8; 32];
    b[..8].copy_from_slice(&value.to_le_bytes());
    blst_scalar { b }
}

/// Verifies all of `signature_sets` with a single multi-pairing.
///
/// Each set is weighted by a fresh random scalar so that invalid signatures cannot cancel each
/// other out. Returns `false` if there are no sets, or if any set has an empty signature or no
/// signing keys.
pub fn verify_signature_sets<'a>(
    signature_sets: impl ExactSizeIterator<Item = &'a SignatureSet<'a>>,
) -> bool {
    let sets = signature_sets.collect::<Vec<_>>();

    if sets.is_empty() {
        return false;
    }

    let mut sigs = Vec::with_capacity(sets.len());
    let mut pks = Vec::with_capacity(sets.len());

    for set in &sets {
        let sig = match set.signature.point() {
            Some(sig) => sig,
            None => return false,
        };
        let pk = match set.signing_key() {
            Some(pk) => pk,
            None => return false,
        };
        sigs.push(sig);
        pks.push(pk);
    }

    let msgs = sets
        .iter()
        .map(|set| set.message.as_bytes())
        .collect::<Vec<_>>();
    let pk_points = pks.iter().map(|pk| pk.point()).collect::<Vec<_>>();

    let rng = &mut rand::thread_rng();
    let rands = (0..sets.len())
        .map(|_| random_scalar(rng))
        .collect::<Vec<_>>();

    let err = blst_core::Signature::verify_multiple_aggregate_signatures(
        &msgs, DST, &pk_points, false, &sigs, false, &rands, RAND_BITS,
    );

    err == BLST_ERROR::BLST_SUCCESS
}

/// Verifies `signatures[i]` over `messages[i]` by `public_keys[i]` for all `i`, as one batch.
///
/// Fails with `Error::MismatchedLengths` rather than silently truncating if the three inputs
/// differ in length.
pub fn verify_multiple_signatures(
    signatures: &[Signature],
    messages: &[Hash256],
    public_keys: &[PublicKey],
) -> Result<bool, Error> {
    if signatures.len() != messages.len() || messages.len() != public_keys.len() {
        return Err(Error::MismatchedLengths {
            signatures: signatures.len(),
            messages: messages.len(),
            public_keys: public_keys.len(),
        });
    }

    let sets = signatures
        .iter()
        .zip(messages)
        .zip(public_keys)
        .map(|((sig, msg), pk)| SignatureSet::single_pubkey(sig, Cow::Borrowed(pk), *msg))
        .collect::<Vec<_>>();

    Ok(verify_signature_sets(sets.iter()))
}
