//! REPL command implementations.

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::RwLock;
use vigil_core::events::{CombatSignal, SignalHandler};
use vigil_core::sampling::ScriptedSource;

use crate::AppState;

/// Running counts over a replayed signal stream.
#[derive(Debug, Default)]
struct ReplayTally {
    hits: u32,
    kills: u32,
    engagements: u32,
}

impl SignalHandler for ReplayTally {
    fn handle_signal(&mut self, signal: &CombatSignal) {
        match signal {
            CombatSignal::DamageInferred { .. } => self.hits += 1,
            CombatSignal::KillBlow { .. } => {
                self.hits += 1;
                self.kills += 1;
            }
            CombatSignal::CombatEnded { .. } => self.engagements += 1,
            _ => {}
        }
    }
}

/// Replay a recorded snapshot stream through the live session.
pub async fn replay(path: &str, state: Arc<RwLock<AppState>>) {
    let epoch = Local::now().naive_local();
    let mut source = match ScriptedSource::from_file(Path::new(path), epoch) {
        Ok(source) => source,
        Err(e) => {
            println!("Failed to load recording: {e}");
            return;
        }
    };

    tracing::info!(path, records = source.remaining(), "replaying snapshot stream");

    let total_records = source.remaining();
    let mut tally = ReplayTally::default();

    let mut s = state.write().await;
    while !source.is_exhausted() {
        let signals = s.session.tick(&mut source);
        tally.handle_signals(&signals);
    }

    let meter = s.session.meter();
    println!(
        "Replayed {} snapshots: {} hits ({} kill blows), {} engagements, {:.0} total damage",
        total_records,
        tally.hits,
        tally.kills,
        tally.engagements,
        meter.total_damage()
    );
}

pub async fn show_dps(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    let meter = s.session.meter();
    let window = meter.snapshot();
    println!(
        "DPS: {:.1} ({:.0} damage over {} hits)",
        meter.current_dps(),
        window.total_damage,
        window.sample_count
    );
}

pub async fn show_stats(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    let history = s.session.history();
    if history.is_empty() {
        println!("No finished engagements");
        return;
    }
    for summary in history.iter() {
        println!(
            "#{:<3} {:>7.1}s  {:>10.0} dmg  {:>8.1} dps  {:>3} hits  {} kills",
            summary.id,
            summary.duration_secs,
            summary.total_damage,
            summary.dps,
            summary.hit_count,
            summary.kill_count
        );
    }
}

pub async fn inject(amount: f32, state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    s.session.meter().record_damage(amount);
    println!("Injected {amount:.1} damage");
}

pub async fn reset(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    s.session.reset_meter();
    println!("DPS window reset");
}

pub async fn show_config(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    let c = &s.config;
    println!("sampling.interval_ms    = {}", c.sampling.interval_ms);
    println!("inference.min_delta     = {}", c.inference.min_delta);
    println!("inference.max_single_hit = {}", c.inference.max_single_hit);
    println!("inference.debounce_ms   = {}", c.inference.debounce_ms);
    println!("capture.kill_blow_cap   = {}", c.capture.kill_blow_cap);
    println!("history_limit           = {}", c.history_limit);
}

/// Tear the session down before leaving the REPL.
pub async fn exit(state: Arc<RwLock<AppState>>) {
    let mut s = state.write().await;
    s.session.end_session(false);
    println!("bye");
}
