#[cfg(test)]
#[macro_export]
macro_rules! ssz_and_tree_hash_tests {
    ($type: ty, $value: expr) => {
        #[test]
        pub fn test_ssz_round_trip() {
            use ssz::{Decode, Encode};

            let original: $type = $value;

            let bytes = original.as_ssz_bytes();
            let decoded = <$type>::from_ssz_bytes(&bytes).unwrap();

            assert_eq!(original, decoded);
        }

        #[test]
        pub fn test_tree_hash_root_is_deterministic() {
            use tree_hash::TreeHash;

            let original: $type = $value;

            assert_eq!(original.tree_hash_root(), original.clone().tree_hash_root());
            assert_ne!(original.tree_hash_root(), tree_hash::Hash256::zero());
        }
    };
}
