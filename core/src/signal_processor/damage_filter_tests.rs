//! Tests for the damage inference filter
//!
//! Exercises the acceptance thresholds, debounce behavior, target switch
//! handling, and kill-blow capture against scripted sample sequences.

use chrono::{Duration, Local, NaiveDateTime};
use vigil_types::TrackerConfig;

use super::damage_filter::DamageInferenceFilter;
use crate::events::CombatSignal;
use crate::sampling::TargetSample;

fn base_time() -> NaiveDateTime {
    Local::now().naive_local()
}

fn sample(target: i64, health: f32, max_health: f32, at: NaiveDateTime) -> TargetSample {
    TargetSample {
        target: Some(target),
        health,
        max_health,
        timestamp: at,
    }
}

fn make_filter() -> DamageInferenceFilter {
    DamageInferenceFilter::new(&TrackerConfig::new())
}

fn damage_amounts(signals: &[CombatSignal]) -> Vec<f32> {
    signals
        .iter()
        .filter_map(|s| match s {
            CombatSignal::DamageInferred { event, .. } => Some(event.amount),
            CombatSignal::KillBlow { event, .. } => Some(event.amount),
            _ => None,
        })
        .collect()
}

#[test]
fn test_no_damage_inferred_out_of_combat() {
    let mut filter = make_filter();
    let t0 = base_time();

    // Health dropping steeply, but the combat flag is off the whole time
    for (i, hp) in [100.0, 80.0, 50.0, 10.0].iter().enumerate() {
        let s = sample(1, *hp, 100.0, t0 + Duration::milliseconds(i as i64 * 100));
        let signals = filter.advance(false, &s);
        assert!(damage_amounts(&signals).is_empty());
    }
}

#[test]
fn test_regen_never_counted_as_damage() {
    let mut filter = make_filter();
    let t0 = base_time();

    for (i, hp) in [40.0, 55.0, 70.0, 100.0].iter().enumerate() {
        let s = sample(1, *hp, 100.0, t0 + Duration::milliseconds(i as i64 * 200));
        let signals = filter.advance(true, &s);
        assert!(damage_amounts(&signals).is_empty());
    }
}

#[test]
fn test_single_valid_drop_produces_one_event() {
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 100.0, 100.0, t0));
    let signals = filter.advance(true, &sample(1, 73.0, 100.0, t0 + Duration::milliseconds(200)));

    assert_eq!(damage_amounts(&signals), vec![27.0]);
}

#[test]
fn test_sub_threshold_delta_ignored() {
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 100.0, 100.0, t0));
    let signals = filter.advance(true, &sample(1, 99.7, 100.0, t0 + Duration::milliseconds(200)));

    assert!(damage_amounts(&signals).is_empty());
}

#[test]
fn test_delta_above_health_pool_rejected() {
    let mut filter = make_filter();
    let t0 = base_time();

    // Stat-swap artifact: baseline recorded against an inflated pool
    filter.advance(true, &sample(1, 900.0, 1000.0, t0));
    // max_health now reads 500 but the delta computes as 850
    let signals = filter.advance(true, &sample(1, 50.0, 500.0, t0 + Duration::milliseconds(200)));

    assert!(damage_amounts(&signals).is_empty());
}

#[test]
fn test_delta_at_single_hit_cap_rejected() {
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 9000.0, 9000.0, t0));
    let signals = filter.advance(true, &sample(1, 1000.0, 9000.0, t0 + Duration::milliseconds(200)));

    // 8000 >= 5000 cap: identity reuse across a despawn within one tick
    assert!(damage_amounts(&signals).is_empty());
}

#[test]
fn test_debounce_drops_second_rapid_hit() {
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 100.0, 100.0, t0));
    let first = filter.advance(true, &sample(1, 80.0, 100.0, t0 + Duration::milliseconds(200)));
    let second = filter.advance(true, &sample(1, 75.0, 100.0, t0 + Duration::milliseconds(300)));

    assert_eq!(damage_amounts(&first), vec![20.0]);
    // 100ms after the accepted hit: a DoT tick, coalesced away
    assert!(damage_amounts(&second).is_empty());
}

#[test]
fn test_first_damage_bypasses_debounce() {
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 100.0, 100.0, t0));
    // Immediately on the next tick, no prior accepted damage
    let signals = filter.advance(true, &sample(1, 90.0, 100.0, t0 + Duration::milliseconds(100)));

    assert_eq!(damage_amounts(&signals), vec![10.0]);
}

#[test]
fn test_target_switch_never_diffs_across_targets() {
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 5000.0, 5000.0, t0));
    // Switch to a much lower-health target; the 4900 "drop" is not damage
    let signals = filter.advance(true, &sample(2, 100.0, 100.0, t0 + Duration::milliseconds(200)));

    assert!(damage_amounts(&signals).is_empty());
    assert!(signals
        .iter()
        .any(|s| matches!(s, CombatSignal::TargetAcquired { target: 2, .. })));
    assert!(signals
        .iter()
        .any(|s| matches!(s, CombatSignal::TargetLost { target: 1, .. })));
}

#[test]
fn test_baseline_established_after_switch() {
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 500.0, 500.0, t0));
    filter.advance(true, &sample(2, 100.0, 100.0, t0 + Duration::milliseconds(200)));
    let signals = filter.advance(true, &sample(2, 60.0, 100.0, t0 + Duration::milliseconds(400)));

    assert_eq!(damage_amounts(&signals), vec![40.0]);
}

#[test]
fn test_kill_blow_captures_small_remainder() {
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 42.0, 100.0, t0));
    let signals = filter.advance(
        true,
        &TargetSample::empty(t0 + Duration::milliseconds(100)),
    );

    let kills: Vec<f32> = signals
        .iter()
        .filter_map(|s| match s {
            CombatSignal::KillBlow { event, .. } => Some(event.amount),
            _ => None,
        })
        .collect();
    assert_eq!(kills, vec![42.0]);
}

#[test]
fn test_kill_blow_rejects_large_remainder() {
    let mut filter = make_filter();
    let t0 = base_time();

    // 800 remaining exceeds the 500 cap: target left range, not a kill
    filter.advance(true, &sample(1, 800.0, 1000.0, t0));
    let signals = filter.advance(
        true,
        &TargetSample::empty(t0 + Duration::milliseconds(100)),
    );

    assert!(damage_amounts(&signals).is_empty());
    assert!(signals
        .iter()
        .any(|s| matches!(s, CombatSignal::TargetLost { target: 1, .. })));
}

#[test]
fn test_combat_end_clears_tracking_without_kill_blow() {
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 42.0, 100.0, t0));
    // Combat drops while the target still holds a kill-blow-sized sliver
    let signals = filter.advance(
        false,
        &TargetSample::empty(t0 + Duration::milliseconds(100)),
    );

    assert!(signals.is_empty());
    assert_eq!(filter.context().target, None);
}

#[test]
fn test_malformed_samples_tolerated() {
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 100.0, 100.0, t0));

    // NaN health and a zero pool: both rejected without touching state
    let nan = sample(1, f32::NAN, 100.0, t0 + Duration::milliseconds(100));
    assert!(filter.advance(true, &nan).is_empty());
    let zero_pool = sample(1, 50.0, 0.0, t0 + Duration::milliseconds(200));
    assert!(filter.advance(true, &zero_pool).is_empty());

    // The baseline survived; a sane follow-up sample still diffs cleanly
    let signals = filter.advance(true, &sample(1, 80.0, 100.0, t0 + Duration::milliseconds(400)));
    assert_eq!(damage_amounts(&signals), vec![20.0]);
}

#[test]
fn test_health_above_pool_clamped() {
    let mut filter = make_filter();
    let t0 = base_time();

    // 120/100 clamps to 100 for the baseline
    filter.advance(true, &sample(1, 120.0, 100.0, t0));
    let signals = filter.advance(true, &sample(1, 70.0, 100.0, t0 + Duration::milliseconds(200)));

    assert_eq!(damage_amounts(&signals), vec![30.0]);
}

#[test]
fn test_debounce_over_four_tick_burst() {
    // (A, 100/100), (A, 80/100) @ 0ms, (A, 79/100) @ 50ms, (A, 60/100) @ 200ms
    // Expected: 20 accepted, 1 coalesced by debounce, 19 accepted.
    let mut filter = make_filter();
    let t0 = base_time();

    filter.advance(true, &sample(1, 100.0, 100.0, t0 - Duration::milliseconds(100)));
    let a = filter.advance(true, &sample(1, 80.0, 100.0, t0));
    let b = filter.advance(true, &sample(1, 79.0, 100.0, t0 + Duration::milliseconds(50)));
    let c = filter.advance(true, &sample(1, 60.0, 100.0, t0 + Duration::milliseconds(200)));

    assert_eq!(damage_amounts(&a), vec![20.0]);
    assert!(damage_amounts(&b).is_empty());
    assert_eq!(damage_amounts(&c), vec![19.0]);
}
