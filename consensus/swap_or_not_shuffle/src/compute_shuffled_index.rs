use crate::Hash256;
use ethereum_hashing::hash;
use std::cmp::max;

/// Return `p(index)` in a pseudorandom permutation `p` of `0...list_size-1` with ``seed`` as entropy.
///
/// Utilizes 'swap or not' shuffling found in
/// https://link.springer.com/content/pdf/10.1007%2F978-3-642-32009-5_1.pdf
/// See the 'generalized domain' algorithm on page 3.
///
/// Note: this function is significantly slower than shuffling a whole list if every index is
/// required, it is intended for sampling a few positions from a large list.
///
/// Returns `None` under any of the following conditions:
///  - `list_size == 0`
///  - `index >= list_size`
///  - `list_size > 2**24`
///  - `list_size > usize::MAX / 2`
pub fn compute_shuffled_index(
    index: usize,
    list_size: usize,
    seed: &[u8],
    shuffle_round_count: u8,
) -> Option<usize> {
    if list_size == 0
        || index >= list_size
        || list_size > usize::MAX / 2
        || list_size > 2_usize.pow(24)
    {
        return None;
    }

    let mut index = index;
    for round in 0..shuffle_round_count {
        let pivot = bytes_to_int64(hash_with_round(seed, round).as_bytes()) as usize % list_size;
        index = do_round(seed, index, pivot, round, list_size);
    }
    Some(index)
}

fn do_round(seed: &[u8], index: usize, pivot: usize, round: u8, list_size: usize) -> usize {
    let flip = (pivot + (list_size - index)) % list_size;
    let position = max(index, flip);
    let source = hash_with_round_and_position(seed, round, position);
    let byte = source[(position % 256) / 8];
    let bit = (byte >> (position % 8)) % 2;
    if bit == 1 {
        flip
    } else {
        index
    }
}

fn hash_with_round_and_position(seed: &[u8], round: u8, position: usize) -> Hash256 {
    let mut preimage = Vec::with_capacity(seed.len() + 5);
    preimage.extend_from_slice(seed);
    preimage.push(round);
    // Only the low four bytes of `position / 256` are hashed.
    preimage.extend_from_slice(&(position as u64 / 256).to_le_bytes()[0..4]);
    Hash256::from_slice(&hash(&preimage))
}

fn hash_with_round(seed: &[u8], round: u8) -> Hash256 {
    let mut preimage = Vec::with_capacity(seed.len() + 1);
    preimage.extend_from_slice(seed);
    preimage.push(round);
    Hash256::from_slice(&hash(&preimage))
}

fn bytes_to_int64(slice: &[u8]) -> u64 {
    let mut bytes = [0; 8];
    bytes.copy_from_slice(&slice[0..8]);
    u64::from_le_bytes(bytes)
}
