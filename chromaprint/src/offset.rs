use tracing::trace;

use crate::scratch::zeroed;
use crate::ChromaprintError;

/// Number of high hash bits kept by [`match_key`].
pub const MATCH_BITS: u32 = 14;

/// Size of the match key space (16384).
pub const MATCH_BUCKETS: usize = 1 << MATCH_BITS;

/// Returns the top [`MATCH_BITS`] bits of a frame hash.
///
/// Dropping the low 18 bits lets frames with small quantization noise
/// land in the same bucket.
pub fn match_key(h: u32) -> usize {
    (h >> (32 - MATCH_BITS)) as usize
}

/// Winning alignment between two fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetVote {
    /// `a` frame index minus `b` frame index for matching content.
    /// Negative means `b` leads by `-offset` frames.
    pub offset: i64,
    /// Number of match keys that voted for `offset`.
    pub votes: u32,
}

/// Finds the most probable frame offset between `a` and `b`.
///
/// # Algorithm
///
/// Each fingerprint records, per match key, the index of the last frame
/// carrying that key (later frames overwrite earlier ones, so memory stays
/// at two fixed tables). Every key seen in both fingerprints then votes
/// for `a_index - b_index`. Keys are scanned in ascending order and the
/// first offset to reach the highest count wins.
///
/// Index 0 doubles as "unset", so a key whose last occurrence is frame 0
/// never votes. The top key (`MATCH_BUCKETS - 1`) is not scanned either.
/// Existing score thresholds are calibrated with both quirks in place.
///
/// `max_offset == 0` searches all offsets; otherwise only offsets with
/// `|offset| <= max_offset` may vote.
///
/// Returns offset 0 with zero votes when no key qualifies.
pub fn find_offset(a: &[u32], b: &[u32], max_offset: u32) -> Result<OffsetVote, ChromaprintError> {
    let num_counts = a
        .len()
        .checked_add(b.len())
        .and_then(|n| n.checked_add(1))
        .ok_or(ChromaprintError::Alloc {
            what: "vote table",
            len: usize::MAX,
        })?;
    let mut counts: Vec<u32> = zeroed("vote table", num_counts)?;
    let mut a_offsets: Vec<u32> = zeroed("offset table", MATCH_BUCKETS)?;
    let mut b_offsets: Vec<u32> = zeroed("offset table", MATCH_BUCKETS)?;

    record_last_index(a, &mut a_offsets);
    record_last_index(b, &mut b_offsets);

    let bsize = b.len() as i64;
    let max_offset = i64::from(max_offset);
    let mut top_count = 0u32;
    let mut top_slot: Option<usize> = None;

    for key in 0..MATCH_BUCKETS - 1 {
        let (ai, bi) = (a_offsets[key], b_offsets[key]);
        if ai == 0 || bi == 0 {
            continue;
        }
        let delta = i64::from(ai) - i64::from(bi);
        if max_offset != 0 && delta.abs() > max_offset {
            continue;
        }
        // delta >= -(bsize - 1), so the slot is always in 0..num_counts.
        let slot = (delta + bsize) as usize;
        counts[slot] = counts[slot].saturating_add(1);
        if counts[slot] > top_count {
            top_count = counts[slot];
            top_slot = Some(slot);
        }
    }

    let vote = match top_slot {
        Some(slot) => OffsetVote {
            offset: slot as i64 - bsize,
            votes: top_count,
        },
        None => OffsetVote::default(),
    };
    trace!(offset = vote.offset, votes = vote.votes, "offset vote");
    Ok(vote)
}

fn record_last_index(fp: &[u32], table: &mut [u32]) {
    for (i, &h) in fp.iter().enumerate() {
        // Fingerprints longer than u32::MAX frames are not meaningful input.
        table[match_key(h)] = i as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: u32) -> u32 {
        k << (32 - MATCH_BITS)
    }

    #[test]
    fn match_key_keeps_top_bits() {
        assert_eq!(match_key(0), 0);
        assert_eq!(match_key(0x0003_FFFF), 0);
        assert_eq!(match_key(0x0004_0000), 1);
        assert_eq!(match_key(u32::MAX), MATCH_BUCKETS - 1);
    }

    #[test]
    fn prefixed_copy_votes_for_negative_offset() {
        let a: Vec<u32> = (1..=8).collect();
        let mut b = vec![0xA000_0000, 0xB000_0000, 0xC000_0000];
        b.extend_from_slice(&a);

        let vote = find_offset(&a, &b, 0).unwrap();
        assert_eq!(vote.offset, -3);
        assert_eq!(vote.votes, 1);
    }

    #[test]
    fn distinct_keys_agree_on_offset() {
        let a: Vec<u32> = (0..100).map(key).collect();
        let b: Vec<u32> = (0..100).map(|k| key(k + 5)).collect();
        // b[i] == a[i + 5], so matching content has a_index - b_index == 5.
        let vote = find_offset(&a, &b, 0).unwrap();
        assert_eq!(vote.offset, 5);
        // Key 5 sits at b index 0 and cannot vote.
        assert_eq!(vote.votes, 94);
    }

    #[test]
    fn swapping_operands_negates_offset() {
        let a: Vec<u32> = (0..50).map(key).collect();
        let b: Vec<u32> = (0..50).map(|k| key(k + 7)).collect();
        let ab = find_offset(&a, &b, 0).unwrap();
        let ba = find_offset(&b, &a, 0).unwrap();
        assert_eq!(ab.offset, -ba.offset);
        assert_eq!(ab.votes, ba.votes);
    }

    #[test]
    fn max_offset_filters_votes() {
        let a: Vec<u32> = (0..100).map(key).collect();
        let b: Vec<u32> = (0..100).map(|k| key(k + 5)).collect();
        assert_eq!(find_offset(&a, &b, 4).unwrap(), OffsetVote::default());
        assert_eq!(find_offset(&a, &b, 5).unwrap().offset, 5);
    }

    #[test]
    fn first_key_wins_ties() {
        let a = [key(9), key(1), key(9), key(2)];
        let b = [key(8), key(2), key(1), key(8), key(8)];
        // key 1: a=1, b=2 -> -1; key 2: a=3, b=1 -> +2; key 8: b only; key 9: a only.
        let vote = find_offset(&a, &b, 0).unwrap();
        assert_eq!(vote, OffsetVote { offset: -1, votes: 1 });
    }

    #[test]
    fn frame_zero_does_not_vote() {
        let a = [key(3)];
        let b = [key(3)];
        assert_eq!(find_offset(&a, &b, 0).unwrap(), OffsetVote::default());
    }

    #[test]
    fn top_bucket_is_not_scanned() {
        let a = [0, u32::MAX, u32::MAX];
        let b = [0, u32::MAX, u32::MAX];
        assert_eq!(find_offset(&a, &b, 0).unwrap(), OffsetVote::default());
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(find_offset(&[], &[], 0).unwrap(), OffsetVote::default());
        assert_eq!(find_offset(&[1, 2, 3], &[], 0).unwrap(), OffsetVote::default());
    }
}
