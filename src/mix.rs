//! Key/seed mixing primitives shared by every engine.
//!
//! `mix` is CRC32C over the key's little-endian bytes, seeded with the
//! low 32 bits of `seed`. The `crc32c` crate uses SSE4.2 / AArch64 CRC
//! instructions where available and a software fallback otherwise, all
//! producing the same values, so `mix` is byte-exact across platforms.

use xxhash_rust::xxh3::xxh3_64_with_seed;

/// 64-to-32-bit avalanche mix of `(key, seed)`.
#[inline]
pub fn mix(key: u64, seed: u64) -> u32 {
    crc32c::crc32c_append(seed as u32, &key.to_le_bytes())
}

/// 64-to-64-bit mix, used where a full-width hash is needed
/// (the Jump front hash consumes the high bits).
#[inline]
pub fn mix64(key: u64, seed: u64) -> u64 {
    xxh3_64_with_seed(&key.to_le_bytes(), seed)
}

/// Cheap multiplicative splat for derived per-key seeds.
#[inline]
pub fn splat32(key: u32) -> u32 {
    key.wrapping_mul(421_757).wrapping_add(1)
}
