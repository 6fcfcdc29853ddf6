use tracing::debug;

use crate::diversity::diversity;
use crate::offset::OffsetVote;
use crate::ChromaprintError;

/// Minimum share of the larger unique-key count that the winning offset
/// must collect; weaker alignments are indistinguishable from noise.
const MIN_VOTE_RATIO: f64 = 0.02;

/// Scores `a` against `b` at the alignment given by `vote`.
///
/// # Algorithm
///
/// 1. Drop the leading frames of whichever fingerprint leads.
/// 2. Compare the overlap two frames (64 bits) at a time and count the
///    differing bits.
/// 3. `score = overlap / min(|a|, |b|) * (1 - 2 * bit_error_rate)`, floored
///    at 0. A 50% bit error rate is what unrelated audio produces.
/// 4. If either side is repetitive (diversity below 1), raise the score to
///    the power `8 - 7 * diversity`.
///
/// Empty overlap and weak alignments score exactly 0.
pub fn score(a: &[u32], b: &[u32], vote: OffsetVote) -> Result<f32, ChromaprintError> {
    let min_size = a.len().min(b.len()) & !1;

    let shift = usize::try_from(vote.offset.unsigned_abs()).unwrap_or(usize::MAX);
    let (a, b) = if vote.offset < 0 {
        (a, b.get(shift..).unwrap_or_default())
    } else {
        (a.get(shift..).unwrap_or_default(), b)
    };

    let size = a.len().min(b.len()) / 2;
    if size == 0 || min_size == 0 {
        debug!(offset = vote.offset, "no overlapping frames");
        return Ok(0.0);
    }

    let div = diversity(a, b)?;
    if f64::from(vote.votes) < div.auniq.max(div.buniq) as f64 * MIN_VOTE_RATIO {
        debug!(
            votes = vote.votes,
            auniq = div.auniq,
            buniq = div.buniq,
            "alignment rejected: too few votes"
        );
        return Ok(0.0);
    }

    let bit_error: u64 = a[..size * 2]
        .iter()
        .zip(&b[..size * 2])
        .map(|(x, y)| u64::from((x ^ y).count_ones()))
        .sum();

    let coverage = size as f64 * 2.0 / min_size as f64;
    let accuracy = 1.0 - 2.0 * bit_error as f64 / (64 * size) as f64;
    let mut score = ((coverage * accuracy) as f32).max(0.0);

    if div.diversity < 1.0 {
        let exponent = (8.0 - 7.0 * f64::from(div.diversity)) as f32;
        score = score.powf(exponent);
    }

    debug!(
        offset = vote.offset,
        votes = vote.votes,
        bit_error,
        diversity = div.diversity,
        score,
        "scored alignment"
    );
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(offset: i64, votes: u32) -> OffsetVote {
        OffsetVote { offset, votes }
    }

    #[test]
    fn identical_scores_one() {
        let a = [1u32, 2, 3, 4];
        assert_eq!(score(&a, &a, vote(0, 1)).unwrap(), 1.0);
    }

    #[test]
    fn negative_offset_trims_b() {
        let a = [1u32, 2, 3, 4];
        let b = [9u32, 9, 1, 2, 3, 4];
        // Overlap is all of a; coverage = 4 / 4.
        assert_eq!(score(&a, &b, vote(-2, 1)).unwrap(), 1.0);
    }

    #[test]
    fn positive_offset_trims_a() {
        let a = [9u32, 9, 1, 2, 3, 4];
        let b = [1u32, 2, 3, 4];
        assert_eq!(score(&a, &b, vote(2, 1)).unwrap(), 1.0);
    }

    #[test]
    fn partial_overlap_scales_by_coverage() {
        let a = [1u32, 2, 3, 4, 5, 6, 7, 8];
        let b = [3u32, 4, 5, 6, 7, 8, 0, 0];
        // 6 overlapping frames -> 3 words, min size 8.
        let s = score(&a, &b, vote(2, 1)).unwrap();
        assert!((s - 0.75).abs() < 1e-6, "got {s}");
    }

    #[test]
    fn odd_frames_are_ignored() {
        let a = [1u32, 2, 3, 4, 5];
        let b = [1u32, 2, 3, 4, 0xFFFF_FFFF];
        // min size rounds down to 4 and the fifth frame is never compared.
        assert_eq!(score(&a, &b, vote(0, 1)).unwrap(), 1.0);
    }

    #[test]
    fn bit_errors_lower_the_score() {
        let a = [0u32, 0, 0, 0];
        let b = [0xFFFF_FFFFu32, 0, 0, 0];
        // 32 of 128 bits differ: 1 - 2 * 0.25.
        let s = score(&a, &b, vote(0, 1)).unwrap();
        assert!((s - 0.5).abs() < 1e-6, "got {s}");
    }

    #[test]
    fn unrelated_content_floors_at_zero() {
        let a = [0u32, 0, 0, 0];
        let b = [u32::MAX; 4];
        assert_eq!(score(&a, &b, vote(0, 1)).unwrap(), 0.0);
    }

    #[test]
    fn offset_past_end_is_zero() {
        let a = [1u32, 2, 3, 4];
        assert_eq!(score(&a, &a, vote(10, 1)).unwrap(), 0.0);
        assert_eq!(score(&a, &a, vote(-10, 1)).unwrap(), 0.0);
        assert_eq!(score(&a, &a, vote(3, 1)).unwrap(), 0.0);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(score(&[], &[1, 2], vote(0, 1)).unwrap(), 0.0);
        assert_eq!(score(&[1, 2], &[], vote(0, 1)).unwrap(), 0.0);
    }

    #[test]
    fn weak_alignment_is_rejected() {
        // 100 distinct keys need about 2 votes.
        let a: Vec<u32> = (0..100u32).map(|i| i << 18).collect();
        assert_eq!(score(&a, &a, vote(0, 1)).unwrap(), 0.0);
        assert_eq!(score(&a, &a, vote(0, 3)).unwrap(), 1.0);
    }

    #[test]
    fn repetitive_content_is_dampened() {
        let a = vec![0xCAFE_BABEu32; 1000];
        let b = vec![0xCAFE_BABEu32 ^ 1; 1000];
        // One bit per frame differs: raw score 1 - 2 * (1 / 32).
        let raw = 1.0f32 - 2.0 / 32.0;
        let s = score(&a, &b, vote(0, 1)).unwrap();

        let d = 11.0f32 / 1000.0 + 0.5;
        let expected = raw.powf((8.0 - 7.0 * f64::from(d)) as f32);
        assert!(s < raw, "repetitive score {s} should be below raw {raw}");
        assert!((s - expected).abs() < 1e-5, "got {s}, want {expected}");
    }
}
