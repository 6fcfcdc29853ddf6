/// Folds a fingerprint into a 32-bit summary by per-bit majority vote.
///
/// Output bit `j` is set iff bit `j` is set in strictly more than half of
/// the frame hashes. Ties and empty input yield 0 for that bit. The result
/// depends only on the multiset of hashes, not their order.
pub fn simhash32(data: &[u32]) -> u32 {
    let votes = bit_votes(data);
    let mut hash = 0u32;
    for (j, &v) in votes.iter().enumerate() {
        if v > 0 {
            hash |= 1 << j;
        }
    }
    hash
}

/// 64-bit variant of [`simhash32`].
///
/// Frame hashes only carry 32 bits, so bits 32..63 are voted by the same
/// source bits as 0..31 and the upper half always mirrors the lower half.
pub fn simhash64(data: &[u32]) -> u64 {
    let lo = u64::from(simhash32(data));
    lo | (lo << 32)
}

fn bit_votes(data: &[u32]) -> [i64; 32] {
    let mut votes = [0i64; 32];
    for &h in data {
        for (j, v) in votes.iter_mut().enumerate() {
            if h & (1 << j) != 0 {
                *v += 1;
            } else {
                *v -= 1;
            }
        }
    }
    votes
}
