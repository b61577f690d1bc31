use rand_chacha::{rand_core::SeedableRng, ChaChaRng};

/// Seed used by [`test_rng`] when `DETERMINISTIC_TEST_RNG=1`.
const DETERMINISTIC_SEED: [u8; 32] = [
    7, 0, 0, 0, 41, 0, 0, 0, 113, 2, 0, 0, 64, 11, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0,
];

/// Return a PRNG for tests and benches, never for real world usage.
///
/// Setting `DETERMINISTIC_TEST_RNG=1` pins the seed so failures reproduce.
pub fn test_rng() -> ChaChaRng {
    #[cfg(feature = "std")]
    {
        let is_deterministic =
            std::env::vars().any(|(key, val)| key == "DETERMINISTIC_TEST_RNG" && val == "1");
        if !is_deterministic {
            return ChaChaRng::from_entropy();
        }
    }
    ChaChaRng::from_seed(DETERMINISTIC_SEED)
}

/// Return a PRNG derived from a small integer seed, for reproducible fixtures.
pub fn seeded_rng(seed: u64) -> ChaChaRng {
    ChaChaRng::seed_from_u64(seed)
}
