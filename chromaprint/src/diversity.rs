use crate::offset::{match_key, MATCH_BUCKETS};
use crate::scratch::zeroed;
use crate::ChromaprintError;

/// Returns the bucket used for diversity counting.
///
/// Same 14-bit extraction as [`match_key`], not a wider 16-bit key.
/// Existing score thresholds are calibrated against the 14-bit width.
pub fn unique_key(h: u32) -> usize {
    match_key(h)
}

/// Content diversity of an aligned fingerprint pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diversity {
    /// Distinct unique keys in `a`.
    pub auniq: usize,
    /// Distinct unique keys in `b`.
    pub buniq: usize,
    /// Heuristic in (0, 1]; below 1 means at least one side is repetitive.
    pub diversity: f32,
}

/// Estimates how repetitive `a` and `b` are.
///
/// `diversity = min(min(1, (auniq + 10) / |a| + 0.5), min(1, (buniq + 10) / |b| + 0.5))`.
///
/// Both slices must be non-empty.
pub fn diversity(a: &[u32], b: &[u32]) -> Result<Diversity, ChromaprintError> {
    let mut seen: Vec<bool> = zeroed("seen table", MATCH_BUCKETS)?;
    let auniq = count_unique(a, &mut seen);
    seen.fill(false);
    let buniq = count_unique(b, &mut seen);

    Ok(Diversity {
        auniq,
        buniq,
        diversity: side_diversity(auniq, a.len()).min(side_diversity(buniq, b.len())),
    })
}

fn count_unique(fp: &[u32], seen: &mut [bool]) -> usize {
    let mut n = 0;
    for &h in fp {
        let k = unique_key(h);
        if !seen[k] {
            seen[k] = true;
            n += 1;
        }
    }
    n
}

fn side_diversity(uniq: usize, size: usize) -> f32 {
    ((uniq + 10) as f32 / size as f32 + 0.5).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_key_uses_match_width() {
        // Documented quirk: 14 bits, not 16. These two hashes differ only
        // in bits 16..17 and therefore share a bucket.
        assert_eq!(unique_key(0x0001_0000), unique_key(0x0002_0000));
        assert_eq!(unique_key(0xFFFF_FFFF), MATCH_BUCKETS - 1);
    }

    #[test]
    fn short_fingerprints_are_fully_diverse() {
        let fp = [1u32, 1, 1, 1];
        let d = diversity(&fp, &fp).unwrap();
        assert_eq!(d.auniq, 1);
        assert_eq!(d.buniq, 1);
        assert_eq!(d.diversity, 1.0);
    }

    #[test]
    fn repetitive_fingerprint_has_low_diversity() {
        let rep = vec![0xCAFE_BABEu32; 1000];
        let varied: Vec<u32> = (0..1000u32).map(|i| i << 18).collect();

        let d = diversity(&rep, &varied).unwrap();
        assert_eq!(d.auniq, 1);
        assert_eq!(d.buniq, 1000);
        assert!((d.diversity - (11.0 / 1000.0 + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn counts_are_per_side() {
        let a = [0x0000_0000u32, 0x0004_0000, 0x0008_0000];
        let b = [0x0000_0000u32];
        let d = diversity(&a, &b).unwrap();
        assert_eq!(d.auniq, 3);
        assert_eq!(d.buniq, 1);
    }

    #[test]
    fn top_key_is_counted_on_both_sides() {
        let a = [u32::MAX];
        let b = [u32::MAX];
        let d = diversity(&a, &b).unwrap();
        assert_eq!(d.auniq, 1);
        assert_eq!(d.buniq, 1);
    }
}
