/// Returns the number of differing bits between two 32-bit values (0..=32).
///
/// As a rule of thumb, SimHashes more than 15 bits apart belong to
/// different recordings. The threshold is left to the caller.
pub fn hdist32(a: u32, b: u32) -> u32 {
    (a ^ b).count_ones()
}

/// Returns the number of differing bits between two 64-bit values (0..=64).
pub fn hdist64(a: u64, b: u64) -> u64 {
    u64::from((a ^ b).count_ones())
}
