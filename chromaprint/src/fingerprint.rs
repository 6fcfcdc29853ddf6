use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::simhash::{simhash32, simhash64};
use crate::ChromaprintError;

/// A raw Chromaprint fingerprint with its (approximate) audio duration.
///
/// The fingerprint only covers the analysed prefix of the audio, which
/// `fpcalc` bounds to 120 seconds by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Duration of the source audio in seconds, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,

    /// Frame hashes, one per analysis frame.
    pub hashes: Vec<u32>,
}

/// `fpcalc -raw -json` output.
#[derive(Deserialize)]
struct FpcalcJson {
    #[serde(default)]
    duration: Option<f32>,
    fingerprint: Vec<i64>,
}

impl Fingerprint {
    /// Creates a fingerprint without duration.
    pub fn new(hashes: Vec<u32>) -> Self {
        Self {
            duration: None,
            hashes,
        }
    }

    /// Sets the audio duration in seconds.
    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Decodes a blob of little-endian packed uint32 values.
    ///
    /// This is the storage format used in databases. The blob length must
    /// be a multiple of 4.
    pub fn from_le_bytes(blob: &[u8]) -> Result<Self, ChromaprintError> {
        if blob.len() % 4 != 0 {
            return Err(ChromaprintError::Misaligned { len: blob.len() });
        }
        let hashes = blob
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self::new(hashes))
    }

    /// Encodes the hashes as little-endian packed uint32 values.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.hashes.iter().flat_map(|h| h.to_le_bytes()).collect()
    }

    /// Parses the output of `fpcalc -raw -json`.
    ///
    /// Negative values are reinterpreted as their 32-bit two's complement,
    /// so both signed and unsigned renderings are accepted.
    pub fn from_fpcalc_json(data: &[u8]) -> Result<Self, ChromaprintError> {
        let raw: FpcalcJson = serde_json::from_slice(data)
            .map_err(|e| ChromaprintError::Parse(format!("fpcalc json: {e}")))?;
        let hashes = raw
            .fingerprint
            .into_iter()
            .map(to_frame_hash)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            duration: raw.duration,
            hashes,
        })
    }

    /// Parses the output of `fpcalc -raw`:
    ///
    /// ```text
    /// DURATION=183
    /// FINGERPRINT=1234,5678,...
    /// ```
    pub fn from_fpcalc_text(text: &str) -> Result<Self, ChromaprintError> {
        let mut duration = None;
        let mut hashes = None;
        for line in text.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            match key {
                "DURATION" => {
                    let d = value
                        .trim()
                        .parse::<f32>()
                        .map_err(|e| ChromaprintError::Parse(format!("DURATION: {e}")))?;
                    duration = Some(d);
                }
                "FINGERPRINT" => hashes = Some(parse_hash_list(value)?),
                _ => {}
            }
        }
        let hashes =
            hashes.ok_or_else(|| ChromaprintError::Parse("missing FINGERPRINT line".into()))?;
        Ok(Self { duration, hashes })
    }

    /// Returns the number of frames.
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Returns true if the fingerprint has no frames.
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Returns the number of distinct frame hashes.
    pub fn unique_count(&self) -> usize {
        self.hashes.iter().collect::<HashSet<_>>().len()
    }

    /// Returns the 32-bit SimHash of the frames.
    pub fn simhash32(&self) -> u32 {
        simhash32(&self.hashes)
    }

    /// Returns the 64-bit SimHash of the frames.
    pub fn simhash64(&self) -> u64 {
        simhash64(&self.hashes)
    }
}

fn parse_hash_list(value: &str) -> Result<Vec<u32>, ChromaprintError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let v = s
                .parse::<i64>()
                .map_err(|e| ChromaprintError::Parse(format!("frame hash {s:?}: {e}")))?;
            to_frame_hash(v)
        })
        .collect()
}

fn to_frame_hash(v: i64) -> Result<u32, ChromaprintError> {
    if let Ok(u) = u32::try_from(v) {
        return Ok(u);
    }
    i32::try_from(v)
        .map(|i| i as u32)
        .map_err(|_| ChromaprintError::Parse(format!("frame hash {v} out of 32-bit range")))
}
