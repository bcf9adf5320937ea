//! DPS aggregation window.
//!
//! All inputs are pre-validated by the damage filter, so the meter has no
//! error conditions of its own. `record` and `reset` may race (the reset
//! command arrives from a control surface that can live on another
//! thread), so the whole window sits behind one mutex and every operation
//! is a single atomic swap against it - no torn reads.

use std::sync::{Mutex, PoisonError};

use chrono::{Local, NaiveDateTime};

use crate::events::DamageEvent;

/// Floor on elapsed time when computing a rate, to avoid dividing by the
/// sub-millisecond gap between the first event and an immediate query.
const MIN_ELAPSED_SECS: f64 = 0.001;

/// Accumulated damage over the time window since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DpsWindow {
    pub total_damage: f64,
    /// Timestamp of the first event recorded since the last reset.
    pub window_start: Option<NaiveDateTime>,
    pub sample_count: u64,
}

/// Thread-safe running DPS accumulator.
#[derive(Debug, Default)]
pub struct DpsMeter {
    window: Mutex<DpsWindow>,
}

impl DpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DpsWindow> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an accepted damage event to the window.
    pub fn record(&self, event: &DamageEvent) {
        let mut window = self.lock();
        if window.window_start.is_none() {
            window.window_start = Some(event.timestamp);
        }
        window.total_damage += f64::from(event.amount);
        window.sample_count += 1;
    }

    /// External injection entry point (manual testing, host hooks).
    /// Stamps the event itself; non-positive amounts are rejected.
    pub fn record_damage(&self, amount: f32) {
        if !amount.is_finite() || amount <= 0.0 {
            tracing::warn!(amount, "ignoring non-positive damage injection");
            return;
        }
        self.record(&DamageEvent {
            amount,
            timestamp: Local::now().naive_local(),
        });
    }

    /// Zero all accumulators. Safe to call at any time, including
    /// concurrently with `record`; idempotent.
    pub fn reset(&self) {
        *self.lock() = DpsWindow::default();
    }

    /// Damage per second over the window, measured against wall clock.
    pub fn current_dps(&self) -> f64 {
        self.current_dps_at(Local::now().naive_local())
    }

    /// Damage per second as of an explicit instant. Returns 0.0 when
    /// nothing has been recorded since the last reset.
    pub fn current_dps_at(&self, now: NaiveDateTime) -> f64 {
        let window = *self.lock();
        let Some(start) = window.window_start else {
            return 0.0;
        };
        let elapsed = now.signed_duration_since(start).num_milliseconds() as f64 / 1000.0;
        window.total_damage / elapsed.max(MIN_ELAPSED_SECS)
    }

    pub fn total_damage(&self) -> f64 {
        self.lock().total_damage
    }

    pub fn hit_count(&self) -> u64 {
        self.lock().sample_count
    }

    /// Consistent copy of the whole window.
    pub fn snapshot(&self) -> DpsWindow {
        *self.lock()
    }
}
