//! Health sampling types and the world-source adapter seam.
//!
//! The tracker never talks to the host environment directly. Everything it
//! knows arrives through [`WorldSource::poll`], one snapshot per tick. The
//! host-side collaborator owns target validity (exists, not the observer,
//! not an ally, exposes health); the tracker only interprets the numbers.

mod scripted;

pub use scripted::{ScriptedSource, SnapshotRecord};

use chrono::NaiveDateTime;

/// Opaque target identity, stable for the lifetime of an entity instance.
/// Identity reuse across despawn/respawn is possible and is one of the
/// artifacts the damage filter has to reject.
pub type TargetId = i64;

/// One health reading for the current primary target, stamped at poll time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSample {
    /// `None` when no candidate target passed the source's validity rules.
    pub target: Option<TargetId>,
    pub health: f32,
    pub max_health: f32,
    pub timestamp: NaiveDateTime,
}

impl TargetSample {
    /// A "no target" sample at the given instant.
    pub fn empty(timestamp: NaiveDateTime) -> Self {
        Self {
            target: None,
            health: 0.0,
            max_health: 0.0,
            timestamp,
        }
    }
}

/// Everything the tracker consumes in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSnapshot {
    /// Whether the observed actor is flagged as in combat by the host.
    pub in_combat: bool,
    pub sample: TargetSample,
}

/// Adapter over the external world-state collaborator.
///
/// `poll` returns `None` when the source cannot produce a snapshot this
/// tick (host hiccup, stream exhausted). The session logs and skips such
/// ticks; they must never abort the polling loop.
pub trait WorldSource {
    fn poll(&mut self) -> Option<WorldSnapshot>;
}
