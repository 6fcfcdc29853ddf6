//! Similarity scoring for precomputed Chromaprint fingerprints.
//!
//! A fingerprint is an ordered sequence of 32-bit frame hashes, one per
//! short-time analysis frame (roughly 7.8 frames per second of audio).
//! This crate compares two such sequences and returns a score in `[0, 1]`.
//!
//! # Pipeline
//!
//! [`compare`] runs three stages:
//!
//! 1. Offset voting: every 14-bit match key present in both fingerprints
//!    votes for the frame offset between its last occurrences. The most
//!    voted offset wins.
//! 2. Alignment scoring: both fingerprints are trimmed to the overlap
//!    implied by the offset, and the fraction of matching bits is scaled
//!    by how much of the shorter fingerprint overlaps.
//! 3. Diversity dampening: repetitive material (loops, silence) inflates
//!    bit accuracy, so scores of low-diversity fingerprints are raised to
//!    a power greater than one.
//!
//! # Coarse Pre-filtering
//!
//! [`simhash32`] folds a whole fingerprint into one 32-bit value by per-bit
//! majority vote. Two recordings of the same audio usually land within a
//! few bits of each other, so [`hdist32`] can reject obvious non-matches
//! before running the full comparison:
//!
//! ```
//! use giztoy_chromaprint::{compare, hdist32, simhash32};
//!
//! let a = [0x0001_0000u32, 0x0002_0000, 0x0003_0000, 0x0004_0000];
//! let b = a;
//!
//! if hdist32(simhash32(&a), simhash32(&b)) <= 15 {
//!     let score = compare(&a, &b, 0).unwrap();
//!     assert_eq!(score, 1.0);
//! }
//! ```
//!
//! Higher-level helpers live in [`Fingerprint`] (blob and `fpcalc` decoding)
//! and [`Matcher`] (quality gate and candidate ranking).

mod compare;
mod diversity;
mod error;
mod fingerprint;
mod hamming;
mod matcher;
mod offset;
mod scratch;
mod score;
mod simhash;


pub use compare::{compare, compare_detailed, Comparison};
pub use diversity::{diversity, unique_key, Diversity};
pub use error::ChromaprintError;
pub use fingerprint::Fingerprint;
pub use hamming::{hdist32, hdist64};
pub use matcher::{Match, MatchConfig, Matcher};
pub use offset::{find_offset, match_key, OffsetVote, MATCH_BITS, MATCH_BUCKETS};
pub use score::score;
pub use simhash::{simhash32, simhash64};
