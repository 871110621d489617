/// Cadence Console - drive a playback session from the terminal
use anyhow::Context;
use cadence_console::{Console, ConsoleConfig, Mode};
use cadence_playback::PlaybackState;
use clap::{Parser, Subcommand};
use std::{fs::File, io::BufReader, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "cadence-console")]
#[command(about = "Headless Cadence playback console", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read commands from standard input (default)
    Run,
    /// Execute commands from a file
    Script {
        /// Script file path
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConsoleConfig::load(cli.config.as_deref())?;
    config.validate()?;

    // Initialize tracing; snapshots own stdout, logs go to stderr
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Cadence console");
    tracing::info!("Backend: {}", config.backend.base_url);

    let mut console = Console::new(&config)?;
    let _subscription = console.subscribe(print_snapshot);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let stdin = std::io::stdin();
            console.run(stdin.lock(), Mode::Interactive, print_snapshot)?;
        }
        Commands::Script { path } => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            console.run(BufReader::new(file), Mode::Script, print_snapshot)?;
        }
    }

    Ok(())
}

fn print_snapshot(state: &PlaybackState) {
    match serde_json::to_string(state) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!("Failed to encode snapshot: {}", e),
    }
}
