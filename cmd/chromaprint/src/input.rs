//! Fingerprint file loading.

use std::path::Path;

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use giztoy_chromaprint::Fingerprint;
use serde::{Deserialize, Serialize};

/// On-disk fingerprint encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Guess from extension and content.
    #[default]
    Auto,
    /// Little-endian packed uint32 array (database blob).
    Blob,
    /// `fpcalc -raw -json` output.
    Json,
    /// `fpcalc -raw` output.
    Text,
}

/// Reads and decodes a fingerprint file.
pub fn load_fingerprint(path: &Path, format: InputFormat) -> Result<Fingerprint> {
    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let format = match format {
        InputFormat::Auto => detect(path, &data),
        f => f,
    };
    tracing::debug!(path = %path.display(), ?format, bytes = data.len(), "decoding fingerprint");
    decode(&data, format).with_context(|| format!("decode {}", path.display()))
}

fn decode(data: &[u8], format: InputFormat) -> Result<Fingerprint> {
    let fp = match format {
        InputFormat::Json => Fingerprint::from_fpcalc_json(data)?,
        InputFormat::Text => Fingerprint::from_fpcalc_text(std::str::from_utf8(data)?)?,
        InputFormat::Blob | InputFormat::Auto => Fingerprint::from_le_bytes(data)?,
    };
    Ok(fp)
}

fn detect(path: &Path, data: &[u8]) -> InputFormat {
    if path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
    {
        return InputFormat::Json;
    }
    let head = data.iter().find(|b| !b.is_ascii_whitespace());
    if head == Some(&b'{') {
        return InputFormat::Json;
    }
    if std::str::from_utf8(data).is_ok_and(|s| s.contains("FINGERPRINT=")) {
        return InputFormat::Text;
    }
    InputFormat::Blob
}
