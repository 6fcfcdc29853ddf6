//! chromaprint - compare and pre-filter raw Chromaprint fingerprints.

mod config;
mod input;
mod output;

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use giztoy_chromaprint::{compare_detailed, hdist32, Comparison, Fingerprint, Match, MatchConfig, Matcher};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use input::{load_fingerprint, InputFormat};
use output::{Output, OutputFormat};

/// Compare and pre-filter raw Chromaprint fingerprints.
///
/// Fingerprints are read from files produced by `fpcalc -raw` (text or
/// `-json`) or from little-endian uint32 blobs as stored in databases.
///
/// Configuration is read from ~/.giztoy/chromaprint/config.yaml when present.
#[derive(Parser)]
#[command(name = "chromaprint")]
#[command(about = "Chromaprint fingerprint comparison tool")]
#[command(version)]
struct Cli {
    /// Config file (default is ~/.giztoy/chromaprint/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Input format of fingerprint files (default from config, else auto)
    #[arg(long, global = true, value_enum)]
    format: Option<InputFormat>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    output: Option<String>,

    /// Output as JSON instead of YAML
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the similarity of two fingerprints
    Compare {
        a: PathBuf,
        b: PathBuf,
        /// Maximum alignment offset in frames, 0 for unbounded (default from config)
        #[arg(long)]
        max_offset: Option<u32>,
    },
    /// Print the SimHash of a fingerprint
    Simhash {
        file: PathBuf,
        /// Print the 64-bit variant
        #[arg(long)]
        wide: bool,
    },
    /// Count differing bits between two 32-bit values (decimal or 0x hex)
    Hdist {
        #[arg(allow_hyphen_values = true)]
        x: String,
        #[arg(allow_hyphen_values = true)]
        y: String,
    },
    /// Rank candidate fingerprints against a query
    Match {
        query: PathBuf,
        #[arg(required = true)]
        candidates: Vec<PathBuf>,
        /// Maximum alignment offset in frames
        #[arg(long)]
        max_offset: Option<u32>,
        /// Report candidates scoring strictly above this
        #[arg(long)]
        min_score: Option<f32>,
        /// Skip candidates whose SimHash differs by more bits
        #[arg(long)]
        max_simhash_distance: Option<u32>,
        /// Match even if the query fails the quality gate
        #[arg(long)]
        force: bool,
    },
}

#[derive(Serialize)]
struct SimhashReport {
    frames: usize,
    simhash: String,
}

#[derive(Serialize)]
struct HdistReport {
    distance: u32,
    likely_distinct: bool,
}

#[derive(Serialize)]
struct MatchReport {
    query: String,
    accepted: bool,
    matches: Vec<Match>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = config::load_config(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(cfg.format);
    let out = Output::new(
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Yaml
        },
        cli.output.clone(),
    );

    match cli.command {
        Commands::Compare { a, b, max_offset } => {
            let fa = load_fingerprint(&a, format)?;
            let fb = load_fingerprint(&b, format)?;
            let max_offset = max_offset.unwrap_or(cfg.matching.max_offset);
            let cmp: Comparison = compare_detailed(&fa.hashes, &fb.hashes, max_offset)?;
            out.write(&cmp)
        }
        Commands::Simhash { file, wide } => {
            let fp = load_fingerprint(&file, format)?;
            let simhash = if wide {
                format!("{:016x}", fp.simhash64())
            } else {
                format!("{:08x}", fp.simhash32())
            };
            out.write(&SimhashReport {
                frames: fp.len(),
                simhash,
            })
        }
        Commands::Hdist { x, y } => {
            let distance = hdist32(parse_u32(&x)?, parse_u32(&y)?);
            out.write(&HdistReport {
                distance,
                likely_distinct: distance > 15,
            })
        }
        Commands::Match {
            query,
            candidates,
            max_offset,
            min_score,
            max_simhash_distance,
            force,
        } => {
            let matcher = Matcher::new(MatchConfig {
                max_offset: max_offset.unwrap_or(cfg.matching.max_offset),
                min_score: min_score.unwrap_or(cfg.matching.min_score),
                max_simhash_distance: max_simhash_distance.or(cfg.matching.max_simhash_distance),
                ..cfg.matching
            });

            let q = load_fingerprint(&query, format)?;
            let accepted = matcher.accepts(&q);
            if !accepted && !force {
                tracing::warn!(
                    query = %query.display(),
                    frames = q.len(),
                    unique = q.unique_count(),
                    "query fingerprint is too short or repetitive to match"
                );
            }

            let mut loaded: Vec<(String, Fingerprint)> = Vec::with_capacity(candidates.len());
            for path in &candidates {
                loaded.push((path.display().to_string(), load_fingerprint(path, format)?));
            }

            let matches = if accepted || force {
                matcher.rank(&q, &loaded)?
            } else {
                Vec::new()
            };
            out.write(&MatchReport {
                query: query.display().to_string(),
                accepted,
                matches,
            })
        }
    }
}

/// Parses a 32-bit value given as decimal, negative decimal or 0x hex.
fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex value {s:?}"));
    }
    let v: i64 = s.parse().with_context(|| format!("invalid value {s:?}"))?;
    if let Ok(u) = u32::try_from(v) {
        return Ok(u);
    }
    match i32::try_from(v) {
        Ok(i) => Ok(i as u32),
        Err(_) => bail!("value {s:?} out of 32-bit range"),
    }
}
