//! Folio - HTTP service that tags uploaded images and suggests a folder.
//!
//! Runs zero-shot CLIP classification against a fixed category vocabulary,
//! falling back to filename keywords when the model cannot be loaded.
//!
//! # Usage
//!
//! ```bash
//! # Start the service (PORT defaults to 5001)
//! folio
//! folio serve --port 8080
//!
//! # Fetch model files ahead of time
//! folio models download
//!
//! # View configuration
//! folio config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod server;

/// Folio - image tagging service.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve(cli::serve::ServeArgs),

    /// Manage model files (download, list, path)
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match folio_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `folio config path`."
            );
            folio_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Folio v{}", folio_core::VERSION);

    match cli.command {
        None => cli::serve::execute(cli::serve::ServeArgs::default(), config).await,
        Some(Commands::Serve(args)) => cli::serve::execute(args, config).await,
        Some(Commands::Models(args)) => cli::models::execute(args, config).await,
        Some(Commands::Config(args)) => cli::config::execute(args).await,
    }
}
