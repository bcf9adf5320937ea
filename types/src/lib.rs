//! Shared configuration types for the VIGIL combat tracker.
//!
//! These are plain serde types with compiled-in defaults. Loading, path
//! resolution, and validation live in `vigil-core::config` so that this
//! crate stays dependency-light and usable from any front end.

use serde::{Deserialize, Serialize};

/// Polling cadence settings for the health sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    /// Milliseconds between health snapshots. The debounce threshold below
    /// is interpreted against this cadence; change them together.
    pub interval_ms: u64,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

/// Acceptance thresholds for the health-delta damage filter.
///
/// Health polling is indirect and lossy: a delta between two snapshots can
/// be one hit, several coalesced hits, a DoT tick, or an entity-identity
/// artifact. These thresholds encode which deltas are plausible as discrete
/// hits. They are tuning constants, not physical limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Deltas at or below this are treated as float noise and ignored.
    pub min_delta: f32,

    /// Hard cap on a single inferred hit. Deltas at or above this are
    /// rejected as despawn/respawn identity-reuse artifacts.
    pub max_single_hit: f32,

    /// Minimum gap between two accepted damage events. Deltas that fail
    /// only this check are real but too-frequent (DoT ticks) and are
    /// dropped rather than counted as separate hits.
    pub debounce_ms: u64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            min_delta: 0.5,
            max_single_hit: 5000.0,
            debounce_ms: 150,
        }
    }
}

/// Kill-blow capture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Upper bound on remaining health credited as a kill blow when a
    /// tracked target vanishes. Larger remainders are treated as "target
    /// left tracking range" and discarded. Deliberately conservative; high
    /// health targets that die out of range lose kill credit.
    pub kill_blow_cap: f32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self { kill_blow_cap: 500.0 }
    }
}

/// Top-level tracker configuration, one `[section]` per component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub sampling: SamplingSettings,
    pub inference: InferenceSettings,
    pub capture: CaptureSettings,

    /// How many finished engagement summaries to retain.
    pub history_limit: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingSettings::default(),
            inference: InferenceSettings::default(),
            capture: CaptureSettings::default(),
            history_limit: 50,
        }
    }
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
