use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::foundation::math::Fnv1a64;

/// Derive an independent stage seed from the run seed.
///
/// Every randomized stage (clip shuffle, background choice, motion presets) draws from its own
/// stream so that adding draws to one stage never perturbs another.
pub fn derive_seed(run_seed: u64, salt: &str) -> u64 {
    let mut h = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    h.write_u64(run_seed);
    h.write_bytes(salt.as_bytes());
    h.finish()
}

/// Deterministic RNG for `seed`.
pub(crate) fn rng_for(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draw a fresh run seed from OS entropy.
///
/// Only the CLI calls this, and only when no seed was supplied; the drawn seed is logged and
/// returned with the run report so the run can be replayed.
pub fn fresh_seed() -> u64 {
    rand::random()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/seed.rs"]
mod tests;
