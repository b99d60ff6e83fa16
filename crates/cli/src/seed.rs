//! Seed entropy for runs without an explicit `--seed`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Distinguishes seeds generated within the same clock reading.
static GENERATED_SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A fresh run seed from wall clock, process id and a call counter, mixed so
/// neighboring inputs land far apart.
pub fn generate_runtime_seed() -> u64 {
    let now_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let pid = u64::from(std::process::id());
    let counter = GENERATED_SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    let entropy = (now_nanos as u64)
        ^ ((now_nanos >> 64) as u64)
        ^ pid.rotate_left(23)
        ^ counter.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    mix_seed(entropy)
}

fn mix_seed(mut value: u64) -> u64 {
    value ^= value >> 30;
    value = value.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    value ^= value >> 27;
    value = value.wrapping_mul(0x94D0_49BB_1331_11EB);
    value ^ (value >> 31)
}
