//! State machines that turn raw world snapshots into combat signals.
//!
//! Two cooperating pieces:
//! - `combat_state`: edge detection over the host's in-combat flag
//! - `damage_filter`: health-delta damage inference and kill-blow capture
//!
//! Both are plain structs with explicitly owned, explicitly resettable
//! state so parallel instances can run in tests without interference.

pub mod combat_state;
pub mod damage_filter;

#[cfg(test)]
mod damage_filter_tests;

pub use combat_state::{CombatStateTracker, CombatTransition};
pub use damage_filter::{DamageInferenceFilter, TrackingContext};
