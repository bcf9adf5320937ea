pub mod engagement;
pub mod tracker;

pub use engagement::{ActiveEngagement, EngagementHistory, EngagementSummary};
pub use tracker::{TrackerSession, run_polling_loop};
