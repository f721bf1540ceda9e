//! TabFlow - AI tab organizer
//!
//! Main entry point for the categorization server and the command-line client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cmd_categorize;
mod cmd_config;
mod cmd_serve;

/// TabFlow CLI.
#[derive(Parser)]
#[command(name = "tabflow")]
#[command(about = "Group browser tabs into topics with a language model")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/tabflow.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the categorization server (default)
    Serve {
        /// Override the configured host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Categorize tabs through a running server and print the stream
    Categorize {
        /// JSON file holding an array of tabs; omit to organize a demo window
        #[arg(long)]
        tabs: Option<PathBuf>,

        /// Personal API key sent with the request
        #[arg(long, env = "TABFLOW_USER_KEY")]
        api_key: Option<String>,

        /// Override the configured categorize endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },

    /// Validate the configuration file
    CheckConfig,
}

/// TabFlow home directory.
fn tabflow_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".tabflow"))
        .unwrap_or_else(|| PathBuf::from(".tabflow"))
}

/// Initialize tracing with console and file output.
///
/// Console output goes to stderr so `categorize` can stream NDJSON on
/// stdout. Log files are written to ~/.tabflow/logs/ with daily rotation.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = tabflow_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("tabflow")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the writer flushing for the program duration.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        None => cmd_serve::run(&cli.config, None, None).await,
        Some(Commands::Serve { host, port }) => cmd_serve::run(&cli.config, host, port).await,
        Some(Commands::Categorize {
            tabs,
            api_key,
            endpoint,
        }) => cmd_categorize::run(&cli.config, tabs, api_key, endpoint).await,
        Some(Commands::CheckConfig) => cmd_config::run(&cli.config),
    }
}
