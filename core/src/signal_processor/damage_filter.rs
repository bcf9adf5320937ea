//! Health-delta damage inference.
//!
//! The tracker cannot subscribe to real combat events; it only sees the
//! target's health once per polling tick. A drop between two snapshots of
//! the *same* target is a candidate hit, and the filter decides whether
//! that candidate is plausible:
//!
//! - sub-threshold deltas are float noise
//! - deltas above the target's health pool are stat-swap/respawn misreads
//! - deltas above the hard cap are entity-identity reuse within one tick
//! - deltas inside the debounce window are DoT ticks re-sampled too fast
//!
//! When a tracked target vanishes mid-combat, the remaining health may be
//! attributed as a final kill blow under a much narrower window.

use chrono::{Duration, NaiveDateTime};
use vigil_types::TrackerConfig;

use crate::events::{CombatSignal, DamageEvent};
use crate::sampling::{TargetId, TargetSample};

/// The filter's running memory.
///
/// `last_damage_at` intentionally survives a target switch: the debounce
/// window measures time since the last *accepted* damage event regardless
/// of who it landed on. Only combat end (or a full reset) clears it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackingContext {
    pub target: Option<TargetId>,
    pub last_health: f32,
    pub last_damage_at: Option<NaiveDateTime>,
}

impl TrackingContext {
    /// Drop the tracked target but keep the damage clock running.
    fn clear_target(&mut self) {
        self.target = None;
        self.last_health = 0.0;
    }
}

/// Health-delta state machine over `{ NoTarget, Tracking }`, gated by the
/// combat flag. One instance per observed actor; state is never ambient.
#[derive(Debug)]
pub struct DamageInferenceFilter {
    ctx: TrackingContext,
    min_delta: f32,
    max_single_hit: f32,
    debounce: Duration,
    kill_blow_cap: f32,
}

impl DamageInferenceFilter {
    /// Build from an already-validated config (see `config::validate`).
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            ctx: TrackingContext::default(),
            min_delta: config.inference.min_delta,
            max_single_hit: config.inference.max_single_hit,
            debounce: Duration::milliseconds(config.inference.debounce_ms as i64),
            kill_blow_cap: config.capture.kill_blow_cap,
        }
    }

    pub fn context(&self) -> TrackingContext {
        self.ctx
    }

    /// Forget everything, including the debounce clock. Called on combat
    /// end and session teardown.
    pub fn reset(&mut self) {
        self.ctx = TrackingContext::default();
    }

    /// Advance one tick. Emits at most one damage signal, plus target
    /// lifecycle signals as tracking state changes.
    pub fn advance(&mut self, in_combat: bool, sample: &TargetSample) -> Vec<CombatSignal> {
        let mut signals = Vec::new();
        let now = sample.timestamp;

        // Out of combat: no inference, and a dying combat state never
        // produces a trailing damage event.
        if !in_combat {
            if self.ctx.target.is_some() {
                self.reset();
            }
            return signals;
        }

        // Target lost while in combat - possibly a kill.
        let Some(target) = sample.target else {
            if let Some(prev) = self.ctx.target {
                let remaining = self.ctx.last_health;
                self.ctx.clear_target();
                signals.push(CombatSignal::TargetLost {
                    target: prev,
                    timestamp: now,
                });
                if remaining > 0.0 {
                    if let Some(event) = self.capture_kill_blow(remaining, now) {
                        self.ctx.last_damage_at = Some(now);
                        signals.push(CombatSignal::KillBlow {
                            target: prev,
                            event,
                        });
                    } else {
                        tracing::debug!(
                            remaining,
                            "target vanished outside kill-blow window; treating as left range"
                        );
                    }
                }
            }
            return signals;
        };

        // Malformed health readings are policy-rejected, never panics.
        let Some((health, max_health)) = sanitize_health(sample) else {
            tracing::warn!(
                target_id = target,
                health = sample.health,
                max_health = sample.max_health,
                "rejecting malformed health sample"
            );
            return signals;
        };

        match self.ctx.target {
            Some(prev) if prev == target => {
                let delta = self.ctx.last_health - health;
                if delta > 0.0 {
                    if let Some(event) = self.accept_delta(delta, max_health, now) {
                        self.ctx.last_damage_at = Some(now);
                        signals.push(CombatSignal::DamageInferred { target, event });
                    }
                }
                // Health unchanged or increased (regen/heal) still moves
                // the baseline forward.
                self.ctx.last_health = health;
            }
            _ => {
                // New target acquired: adopt as baseline, no diff to make.
                if let Some(prev) = self.ctx.target {
                    signals.push(CombatSignal::TargetLost {
                        target: prev,
                        timestamp: now,
                    });
                }
                self.ctx.target = Some(target);
                self.ctx.last_health = health;
                signals.push(CombatSignal::TargetAcquired {
                    target,
                    timestamp: now,
                });
            }
        }

        signals
    }

    /// The four-way acceptance test for a positive health delta.
    fn accept_delta(
        &self,
        delta: f32,
        max_health: f32,
        now: NaiveDateTime,
    ) -> Option<DamageEvent> {
        if delta <= self.min_delta {
            return None; // float noise
        }
        if delta > max_health {
            tracing::debug!(delta, max_health, "rejecting delta above health pool");
            return None;
        }
        if delta >= self.max_single_hit {
            tracing::debug!(delta, "rejecting delta above single-hit cap");
            return None;
        }

        // The first damage ever recorded bypasses the debounce (elapsed
        // time is treated as infinite).
        if let Some(last) = self.ctx.last_damage_at {
            if now.signed_duration_since(last) < self.debounce {
                // Real but too-frequent (DoT tick); drop silently.
                tracing::debug!(delta, "coalescing sub-debounce delta");
                return None;
            }
        }

        Some(DamageEvent {
            amount: delta,
            timestamp: now,
        })
    }

    /// Attribute remaining health as a final hit when a tracked target
    /// disappears. Accepts only a small, plausibly-lethal sliver; a large
    /// remainder means the target left detection range rather than died.
    fn capture_kill_blow(
        &self,
        remaining: f32,
        timestamp: NaiveDateTime,
    ) -> Option<DamageEvent> {
        if remaining > self.min_delta && remaining < self.kill_blow_cap {
            Some(DamageEvent {
                amount: remaining,
                timestamp,
            })
        } else {
            None
        }
    }
}

/// Clamp a live target's health into `[0, max_health]`; reject non-finite
/// readings and non-positive health pools outright.
fn sanitize_health(sample: &TargetSample) -> Option<(f32, f32)> {
    if !sample.health.is_finite() || !sample.max_health.is_finite() {
        return None;
    }
    if sample.max_health <= 0.0 {
        return None;
    }
    Some((sample.health.clamp(0.0, sample.max_health), sample.max_health))
}
