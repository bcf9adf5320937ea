pub mod config;
pub mod events;
pub mod metrics;
pub mod sampling;
pub mod session;
pub mod signal_processor;

// Re-exports for convenience
pub use events::{CombatSignal, DamageEvent, SignalHandler};
pub use metrics::DpsMeter;
pub use sampling::{ScriptedSource, TargetId, TargetSample, WorldSnapshot, WorldSource};
pub use session::TrackerSession;
