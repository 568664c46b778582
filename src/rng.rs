//! Seeded generators handed to each splitting component.

use crate::hash::stable_hash_str;
use crate::types::SeedTag;

/// SplitMix64 generator with a fully observable `u64` state.
///
/// Every component owns its own instance, derived from the master seed and a
/// component tag, so the order in which components run never changes results.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Create a generator from a raw seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Create the generator for `tag` under master seed `seed`.
    pub fn for_component(seed: u64, tag: SeedTag) -> Self {
        Self::new(stable_hash_str(seed, tag))
    }

    /// Current internal state.
    pub fn state(&self) -> u64 {
        self.state
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64_internal() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let bytes = self.next_u64_internal().to_le_bytes();
            let copy_len = (dest.len() - offset).min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}
