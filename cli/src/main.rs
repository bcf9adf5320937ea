use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;
use vigil_cli::{AppState, commands, readline};
use vigil_core::TrackerSession;

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // A broken config file is fatal here; a missing one means defaults.
    let config = vigil_core::config::load_or_default().map_err(|e| e.to_string())?;
    let session = TrackerSession::new(&config).map_err(|e| e.to_string())?;
    let state = Arc::new(RwLock::new(AppState::new(config, session)));

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, Arc::clone(&state)).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "cli")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded snapshot stream (JSONL) through the tracker
    Replay {
        #[arg(short, long)]
        path: String,
    },
    /// Show the live DPS window
    Dps,
    /// Show finished engagement summaries
    Stats,
    /// Inject a manual damage amount into the meter
    Inject {
        #[arg(short, long)]
        amount: f32,
    },
    /// Zero the DPS window
    Reset,
    Config,
    Exit,
}

async fn respond(line: &str, state: Arc<RwLock<AppState>>) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "vigil".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Replay { path }) => commands::replay(path, Arc::clone(&state)).await,
        Some(Commands::Dps) => commands::show_dps(Arc::clone(&state)).await,
        Some(Commands::Stats) => commands::show_stats(Arc::clone(&state)).await,
        Some(Commands::Inject { amount }) => commands::inject(*amount, Arc::clone(&state)).await,
        Some(Commands::Reset) => commands::reset(Arc::clone(&state)).await,
        Some(Commands::Config) => commands::show_config(Arc::clone(&state)).await,
        Some(Commands::Exit) => {
            commands::exit(Arc::clone(&state)).await;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
