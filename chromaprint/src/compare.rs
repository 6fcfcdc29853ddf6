use serde::Serialize;

use crate::offset::find_offset;
use crate::score::score;
use crate::ChromaprintError;

/// Result of comparing two fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    /// Winning alignment, `a` frame index minus `b` frame index.
    pub offset: i64,
    /// Votes collected by the winning offset.
    pub votes: u32,
    /// Similarity in [0, 1].
    pub score: f32,
}

/// Compares two fingerprints and returns a similarity score in [0, 1].
///
/// `max_offset` bounds the alignment search in frames; 0 means unbounded.
/// The only error is failure to allocate the per-call scratch tables.
pub fn compare(a: &[u32], b: &[u32], max_offset: u32) -> Result<f32, ChromaprintError> {
    Ok(compare_detailed(a, b, max_offset)?.score)
}

/// Like [`compare`], but also reports the winning offset and its votes.
pub fn compare_detailed(a: &[u32], b: &[u32], max_offset: u32) -> Result<Comparison, ChromaprintError> {
    let vote = find_offset(a, b, max_offset)?;
    let score = score(a, b, vote)?;
    Ok(Comparison {
        offset: vote.offset,
        votes: vote.votes,
        score,
    })
}
