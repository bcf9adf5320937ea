//! Engagement accumulation and history.
//!
//! An engagement spans one EnteredCombat..LeftCombat window. While active
//! it accumulates accepted damage per target; on combat end it is
//! finalized into a summary and appended to a bounded history.

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use hashbrown::HashMap;

use crate::events::DamageEvent;
use crate::sampling::TargetId;

/// Running accumulator for the combat window currently in progress.
#[derive(Debug, Clone)]
pub struct ActiveEngagement {
    pub id: u64,
    pub started_at: NaiveDateTime,
    pub total_damage: f64,
    pub hit_count: u32,
    pub kill_count: u32,
    /// Accepted damage per target, for breakdown queries.
    pub damage_by_target: HashMap<TargetId, f64>,
}

impl ActiveEngagement {
    pub fn new(id: u64, started_at: NaiveDateTime) -> Self {
        Self {
            id,
            started_at,
            total_damage: 0.0,
            hit_count: 0,
            kill_count: 0,
            damage_by_target: HashMap::new(),
        }
    }

    pub fn add_damage(&mut self, target: TargetId, event: &DamageEvent) {
        let amount = f64::from(event.amount);
        self.total_damage += amount;
        self.hit_count += 1;
        *self.damage_by_target.entry(target).or_insert(0.0) += amount;
    }

    pub fn add_kill_blow(&mut self, target: TargetId, event: &DamageEvent) {
        self.add_damage(target, event);
        self.kill_count += 1;
    }

    /// Close the window and produce its summary.
    pub fn finalize(self, ended_at: NaiveDateTime) -> EngagementSummary {
        let duration_secs = ended_at
            .signed_duration_since(self.started_at)
            .num_milliseconds() as f64
            / 1000.0;
        let dps = if duration_secs > 0.0 {
            self.total_damage / duration_secs
        } else {
            0.0
        };

        EngagementSummary {
            id: self.id,
            started_at: self.started_at,
            ended_at,
            duration_secs,
            total_damage: self.total_damage,
            hit_count: self.hit_count,
            kill_count: self.kill_count,
            dps,
        }
    }
}

/// Immutable record of a finished engagement.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementSummary {
    pub id: u64,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub duration_secs: f64,
    pub total_damage: f64,
    pub hit_count: u32,
    pub kill_count: u32,
    pub dps: f64,
}

/// Bounded window of finished engagements, newest last.
#[derive(Debug, Clone)]
pub struct EngagementHistory {
    entries: VecDeque<EngagementSummary>,
    limit: usize,
}

impl EngagementHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit.min(16)),
            limit,
        }
    }

    pub fn add(&mut self, summary: EngagementSummary) {
        self.entries.push_back(summary);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&EngagementSummary> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EngagementSummary> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Local};

    #[test]
    fn test_finalize_computes_dps_over_duration() {
        let t0 = Local::now().naive_local();
        let mut engagement = ActiveEngagement::new(1, t0);
        engagement.add_damage(
            7,
            &DamageEvent {
                amount: 120.0,
                timestamp: t0 + Duration::seconds(1),
            },
        );
        engagement.add_damage(
            9,
            &DamageEvent {
                amount: 80.0,
                timestamp: t0 + Duration::seconds(2),
            },
        );

        let summary = engagement.finalize(t0 + Duration::seconds(10));
        assert_eq!(summary.total_damage, 200.0);
        assert_eq!(summary.hit_count, 2);
        assert!((summary.dps - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_breakdown_attributes_per_target() {
        let t0 = Local::now().naive_local();
        let mut engagement = ActiveEngagement::new(1, t0);
        let event = DamageEvent {
            amount: 10.0,
            timestamp: t0,
        };
        engagement.add_damage(7, &event);
        engagement.add_damage(7, &event);
        engagement.add_kill_blow(9, &event);

        assert_eq!(engagement.damage_by_target[&7], 20.0);
        assert_eq!(engagement.damage_by_target[&9], 10.0);
        assert_eq!(engagement.kill_count, 1);
    }

    #[test]
    fn test_history_trims_to_limit() {
        let t0 = Local::now().naive_local();
        let mut history = EngagementHistory::new(2);
        for id in 0..5 {
            history.add(ActiveEngagement::new(id, t0).finalize(t0 + Duration::seconds(1)));
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().id, 4);
        assert_eq!(history.iter().next().unwrap().id, 3);
    }
}
