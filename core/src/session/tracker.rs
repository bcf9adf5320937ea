//! Per-tick orchestration of the tracking pipeline.
//!
//! One `TrackerSession` drives sampler -> combat gate -> damage filter ->
//! DPS meter for a single observed actor. Everything runs synchronously
//! inside one tick; the only cross-thread surface is the shared meter,
//! which is internally locked.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::sync::watch;
use vigil_types::TrackerConfig;

use super::engagement::{ActiveEngagement, EngagementHistory};
use crate::config::{self, ConfigError};
use crate::events::CombatSignal;
use crate::metrics::DpsMeter;
use crate::sampling::{WorldSnapshot, WorldSource};
use crate::signal_processor::{CombatStateTracker, CombatTransition, DamageInferenceFilter};

/// Session state for one observed actor.
#[derive(Debug)]
pub struct TrackerSession {
    combat_state: CombatStateTracker,
    filter: DamageInferenceFilter,
    meter: Arc<DpsMeter>,
    engagement: Option<ActiveEngagement>,
    history: EngagementHistory,
    next_engagement_id: u64,
    last_tick_at: Option<NaiveDateTime>,
    sample_interval_ms: u64,
}

impl TrackerSession {
    /// Validates the config up front; a bad threshold never reaches the
    /// filter.
    pub fn new(config: &TrackerConfig) -> Result<Self, ConfigError> {
        config::validate(config)?;
        Ok(Self {
            combat_state: CombatStateTracker::new(),
            filter: DamageInferenceFilter::new(config),
            meter: Arc::new(DpsMeter::new()),
            engagement: None,
            history: EngagementHistory::new(config.history_limit.max(1)),
            next_engagement_id: 0,
            last_tick_at: None,
            sample_interval_ms: config.sampling.interval_ms,
        })
    }

    /// Shared handle to the DPS meter, for control surfaces and display.
    pub fn meter(&self) -> Arc<DpsMeter> {
        Arc::clone(&self.meter)
    }

    pub fn history(&self) -> &EngagementHistory {
        &self.history
    }

    pub fn current_engagement(&self) -> Option<&ActiveEngagement> {
        self.engagement.as_ref()
    }

    pub fn in_combat(&self) -> bool {
        self.combat_state.in_combat()
    }

    pub fn sample_interval_ms(&self) -> u64 {
        self.sample_interval_ms
    }

    /// Run one polling tick against the world source. A source that
    /// cannot produce a snapshot costs us the tick, never the session.
    pub fn tick(&mut self, source: &mut dyn WorldSource) -> Vec<CombatSignal> {
        let Some(snapshot) = source.poll() else {
            tracing::debug!("world source produced no snapshot; skipping tick");
            return Vec::new();
        };
        self.advance(snapshot)
    }

    /// Advance the pipeline with an already-obtained snapshot.
    pub fn advance(&mut self, snapshot: WorldSnapshot) -> Vec<CombatSignal> {
        let now = snapshot.sample.timestamp;
        self.last_tick_at = Some(now);

        let mut signals = Vec::new();

        match self.combat_state.update(snapshot.in_combat) {
            Some(CombatTransition::EnteredCombat) => {
                let id = self.next_engagement_id;
                self.next_engagement_id += 1;
                self.engagement = Some(ActiveEngagement::new(id, now));
                tracing::info!(engagement_id = id, "combat started");
                signals.push(CombatSignal::CombatStarted { timestamp: now });
            }
            Some(CombatTransition::LeftCombat) => {
                self.filter.reset();
                self.finalize_engagement(now);
                signals.push(CombatSignal::CombatEnded { timestamp: now });
            }
            None => {}
        }

        let filter_signals = self.filter.advance(snapshot.in_combat, &snapshot.sample);
        for signal in &filter_signals {
            match signal {
                CombatSignal::DamageInferred { target, event } => {
                    self.meter.record(event);
                    if let Some(engagement) = self.engagement.as_mut() {
                        engagement.add_damage(*target, event);
                    }
                }
                CombatSignal::KillBlow { target, event } => {
                    self.meter.record(event);
                    if let Some(engagement) = self.engagement.as_mut() {
                        engagement.add_kill_blow(*target, event);
                    }
                }
                _ => {}
            }
        }
        signals.extend(filter_signals);

        signals
    }

    /// Zero the DPS window without touching tracking state.
    pub fn reset_meter(&self) {
        self.meter.reset();
    }

    /// Wholesale teardown: combat state, tracking context, and the open
    /// engagement go together. `reset_window` also zeroes the DPS meter
    /// (atomic with respect to concurrent `record` calls - both go
    /// through the meter's lock).
    pub fn end_session(&mut self, reset_window: bool) {
        let ended_at = self.last_tick_at.unwrap_or_else(|| {
            chrono::Local::now().naive_local()
        });
        self.combat_state.reset();
        self.filter.reset();
        self.finalize_engagement(ended_at);
        if reset_window {
            self.meter.reset();
        }
    }

    fn finalize_engagement(&mut self, ended_at: NaiveDateTime) {
        if let Some(engagement) = self.engagement.take() {
            let summary = engagement.finalize(ended_at);
            tracing::info!(
                engagement_id = summary.id,
                total_damage = summary.total_damage,
                dps = summary.dps,
                "combat ended"
            );
            self.history.add(summary);
        }
    }
}

/// Drive a session from a tokio interval until shutdown is signalled.
///
/// Each tick is independently fault-tolerant: a misbehaving source skips
/// that tick and the loop keeps running. On shutdown the session is torn
/// down wholesale and returned to the caller.
pub async fn run_polling_loop<S>(
    mut session: TrackerSession,
    mut source: S,
    mut shutdown: watch::Receiver<bool>,
) -> TrackerSession
where
    S: WorldSource + Send,
{
    let period = std::time::Duration::from_millis(session.sample_interval_ms());
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let signals = session.tick(&mut source);
                for signal in &signals {
                    tracing::debug!(?signal, "combat signal");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    session.end_session(true);
    session
}
