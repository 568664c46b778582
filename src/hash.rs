const FNV1A64_OFFSET: u64 = 0xcbf29ce484222325;
const FNV1A64_PRIME: u64 = 0x100000001b3;

/// FNV-1a over raw bytes. Stable across toolchains, unlike `DefaultHasher`.
pub fn stable_hash_with(f: impl FnOnce(&mut dyn FnMut(&[u8]))) -> u64 {
    let mut hash = FNV1A64_OFFSET;
    let mut feed = |bytes: &[u8]| {
        for byte in bytes {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV1A64_PRIME);
        }
    };
    f(&mut feed);
    hash
}

pub fn stable_hash_str(seed: u64, value: &str) -> u64 {
    stable_hash_with(|feed| {
        feed(&seed.to_le_bytes());
        feed(value.as_bytes());
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_hash_str_depends_on_seed_and_value() {
        assert_eq!(stable_hash_str(7, "multi"), stable_hash_str(7, "multi"));
        assert_ne!(stable_hash_str(7, "multi"), stable_hash_str(8, "multi"));
        assert_ne!(stable_hash_str(7, "multi"), stable_hash_str(7, "singleton"));
    }

    #[test]
    fn empty_input_hashes_to_offset_basis() {
        assert_eq!(stable_hash_with(|_| {}), FNV1A64_OFFSET);
    }
}
