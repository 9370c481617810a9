//! Memoized report computation.
//!
//! The report is a pure function of the match log, so it only needs to be
//! recomputed when the log changes. The cache keys the last report by a
//! SHA256 fingerprint of the log's JSON serialization.

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::calculate::compute_stats;
use crate::models::{ComputedStats, Game};

/// Content hash of a match log.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hash the canonical JSON form of the games, in order.
    pub fn of(games: &[Game]) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(games)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.0[..self.0.len().min(12)])
    }
}

/// Holds the most recent report and the fingerprint it was computed from.
#[derive(Debug, Default)]
pub struct StatsCache {
    entry: Option<(Fingerprint, Arc<ComputedStats>)>,
    hits: u64,
    misses: u64,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached report if `games` is unchanged, otherwise compute
    /// and cache a fresh one.
    pub fn get_or_compute(&mut self, games: &[Game]) -> Arc<ComputedStats> {
        let fingerprint = match Fingerprint::of(games) {
            Ok(fp) => fp,
            Err(e) => {
                warn!("Failed to fingerprint match log, computing uncached: {}", e);
                self.misses += 1;
                return Arc::new(compute_stats(games));
            }
        };

        if let Some((cached, stats)) = &self.entry {
            if *cached == fingerprint {
                self.hits += 1;
                debug!("Stats cache hit for {:?}", fingerprint);
                return Arc::clone(stats);
            }
        }

        self.misses += 1;
        debug!("Stats cache miss for {:?}, recomputing", fingerprint);
        let stats = Arc::new(compute_stats(games));
        self.entry = Some((fingerprint, Arc::clone(&stats)));
        stats
    }

    /// Fingerprint of the cached report, if any.
    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.entry.as_ref().map(|(fp, _)| fp)
    }

    /// Drop the cached report.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
