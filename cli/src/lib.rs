pub mod commands;

use std::io::Write;

use vigil_core::TrackerSession;
use vigil_types::TrackerConfig;

/// Mutable CLI state shared across commands.
pub struct AppState {
    pub config: TrackerConfig,
    pub session: TrackerSession,
}

impl AppState {
    pub fn new(config: TrackerConfig, session: TrackerSession) -> Self {
        Self { config, session }
    }
}

/// Prompt and read one line from stdin.
pub fn readline() -> Result<String, String> {
    write!(std::io::stdout(), "> ").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())?;
    let mut buffer = String::new();
    std::io::stdin()
        .read_line(&mut buffer)
        .map_err(|e| e.to_string())?;
    Ok(buffer)
}
