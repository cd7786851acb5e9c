//! Seedable randomness for loot rolls.
//!
//! Every rolling function takes `&mut R where R: Rng + ?Sized`, so callers
//! choose the source: `thread_rng()` in gameplay, `LootRng` seeded in tests
//! and simulations. Seeds for independent streams are derived with SHA3 the
//! same way the balance simulator derives per-build hashes.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use sha3::{Digest, Sha3_256};

/// Deterministic RNG used by simulations, the bridge and tests
pub type LootRng = Xoshiro256PlusPlus;

/// Create a deterministic RNG from a seed
pub fn seeded(seed: u64) -> LootRng {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// Derive the seed of stream `index` from a base seed.
/// Streams are independent of each other and stable across runs.
pub fn derive_seed(base_seed: u64, index: u64) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(base_seed.to_le_bytes());
    hasher.update(index.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

/// Create the RNG for stream `index` of a base seed
pub fn stream(base_seed: u64, index: u64) -> LootRng {
    seeded(derive_seed(base_seed, index))
}
