//! Combat state edge detection.
//!
//! The host exposes "is the observed actor in combat" as a bare boolean
//! that we poll every tick. This tracker remembers the previous reading
//! and reports transitions exactly on edges. Everything downstream is
//! gated on those edges: leaving combat clears the damage filter's
//! tracking context, entering combat starts a fresh target search.

/// A combat flag edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatTransition {
    EnteredCombat,
    LeftCombat,
}

/// Remembers the previous combat flag and reports edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatStateTracker {
    in_combat: bool,
}

impl CombatStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance with this tick's flag. Returns a transition exactly when
    /// the flag changed since the previous tick, `None` otherwise.
    pub fn update(&mut self, actor_in_combat: bool) -> Option<CombatTransition> {
        let transition = match (self.in_combat, actor_in_combat) {
            (false, true) => Some(CombatTransition::EnteredCombat),
            (true, false) => Some(CombatTransition::LeftCombat),
            _ => None,
        };
        self.in_combat = actor_in_combat;
        transition
    }

    pub fn in_combat(&self) -> bool {
        self.in_combat
    }

    /// Return to the initial out-of-combat state with no pending edge.
    pub fn reset(&mut self) {
        self.in_combat = false;
    }
}
