use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compare::compare_detailed;
use crate::fingerprint::Fingerprint;
use crate::hamming::hdist32;
use crate::ChromaprintError;

/// Configuration for [`Matcher`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum alignment offset in frames (default: 80, about 10 seconds).
    pub max_offset: u32,

    /// A candidate must score strictly above this (default: 0.75).
    pub min_score: f32,

    /// Maximum duration difference in seconds between query and candidate
    /// when both durations are known (default: 7.0).
    pub duration_tolerance: f32,

    /// Minimum audio duration in seconds for a fingerprint to be trusted
    /// (default: 25.0). Accuracy drops sharply on shorter clips.
    pub min_duration: f32,

    /// Minimum number of distinct frame hashes (default: 80).
    pub min_unique: usize,

    /// Skip candidates whose 32-bit SimHash is more than this many bits
    /// away from the query's. Disabled by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_simhash_distance: Option<u32>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_offset: 80,
            min_score: 0.75,
            duration_tolerance: 7.0,
            min_duration: 25.0,
            min_unique: 80,
            max_simhash_distance: None,
        }
    }
}

impl MatchConfig {
    /// Replaces unset or out-of-range fields with defaults.
    pub fn with_defaults(mut self) -> Self {
        let d = Self::default();
        if self.max_offset == 0 {
            self.max_offset = d.max_offset;
        }
        if !(self.min_score > 0.0 && self.min_score < 1.0) {
            self.min_score = d.min_score;
        }
        if !(self.duration_tolerance > 0.0) {
            self.duration_tolerance = d.duration_tolerance;
        }
        if !(self.min_duration >= 0.0) {
            self.min_duration = d.min_duration;
        }
        if self.min_unique == 0 {
            self.min_unique = d.min_unique;
        }
        self
    }
}

/// A candidate that matched the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Caller-supplied candidate identifier.
    pub id: String,
    /// Similarity in (min_score, 1].
    pub score: f32,
    /// Alignment offset, query frame index minus candidate frame index.
    pub offset: i64,
    /// Votes collected by the winning offset.
    pub votes: u32,
}

/// Finds recordings of the same audio among candidate fingerprints.
///
/// Thread-safe: holds only immutable configuration.
#[derive(Debug, Clone)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl Matcher {
    /// Creates a Matcher; unset config fields fall back to defaults.
    pub fn new(cfg: MatchConfig) -> Self {
        Self {
            cfg: cfg.with_defaults(),
        }
    }

    /// Returns the effective configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Reports whether a fingerprint is long and varied enough to match on.
    ///
    /// Fingerprints without a duration are judged on content alone.
    pub fn accepts(&self, fp: &Fingerprint) -> bool {
        if fp.duration.is_some_and(|d| d < self.cfg.min_duration) {
            return false;
        }
        fp.unique_count() >= self.cfg.min_unique
    }

    /// Compares `query` against every candidate and returns the matches,
    /// best first. Equal scores keep candidate order.
    pub fn rank<S: AsRef<str>>(
        &self,
        query: &Fingerprint,
        candidates: &[(S, Fingerprint)],
    ) -> Result<Vec<Match>, ChromaprintError> {
        let query_simhash = self.cfg.max_simhash_distance.map(|_| query.simhash32());
        let mut matches = Vec::new();

        for (id, cand) in candidates {
            let id = id.as_ref();
            if let (Some(q), Some(c)) = (query.duration, cand.duration) {
                if (q - c).abs() > self.cfg.duration_tolerance {
                    debug!(id, query = q, candidate = c, "skipped: duration mismatch");
                    continue;
                }
            }
            if let (Some(max), Some(q)) = (self.cfg.max_simhash_distance, query_simhash) {
                let dist = hdist32(q, cand.simhash32());
                if dist > max {
                    debug!(id, dist, "skipped: simhash distance");
                    continue;
                }
            }

            let cmp = compare_detailed(&query.hashes, &cand.hashes, self.cfg.max_offset)?;
            if cmp.score > self.cfg.min_score {
                matches.push(Match {
                    id: id.to_string(),
                    score: cmp.score,
                    offset: cmp.offset,
                    votes: cmp.votes,
                });
            }
        }

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(matches)
    }
}
