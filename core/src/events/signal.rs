use chrono::NaiveDateTime;

use crate::sampling::TargetId;

/// A single inferred damage increment.
///
/// Produced by the damage filter or kill-blow capture, consumed exactly
/// once by the DPS aggregator. The amount is always positive; validation
/// happens before construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub amount: f32,
    pub timestamp: NaiveDateTime,
}

/// Signals emitted by the tracker session for cross-cutting concerns.
/// These represent "interesting things that happened" at a higher level
/// than raw health snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatSignal {
    // Combat lifecycle
    CombatStarted {
        timestamp: NaiveDateTime,
    },
    CombatEnded {
        timestamp: NaiveDateTime,
    },

    // Target tracking
    TargetAcquired {
        target: TargetId,
        timestamp: NaiveDateTime,
    },
    TargetLost {
        target: TargetId,
        timestamp: NaiveDateTime,
    },

    // Inferred damage
    DamageInferred {
        target: TargetId,
        event: DamageEvent,
    },
    /// Final damage attributed when a tracked target vanished while
    /// holding a plausibly-lethal sliver of health.
    KillBlow {
        target: TargetId,
        event: DamageEvent,
    },
}
