//! The `folio models` command for managing model files.

use clap::{Args, Subcommand};
use folio_core::model::files::{self, ModelPaths, MODEL_FILES};
use folio_core::Config;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model management.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Download the CLIP vision encoder, text encoder, and tokenizer
    Download,

    /// List model files and whether they are installed
    List,

    /// Show model directory path
    Path,
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs, config: Config) -> anyhow::Result<()> {
    let paths = ModelPaths::from_config(&config);

    match args.command {
        ModelsCommand::Download => {
            if paths.is_complete() {
                tracing::info!("All model files already present in {:?}", paths.dir);
                return Ok(());
            }

            tracing::info!(
                "Downloading {} from {}...",
                config.model.name,
                config.model.repo
            );
            let client = reqwest::Client::new();
            files::download_missing(&paths, &config.model.repo, &client).await?;
            tracing::info!("All downloads complete.");
        }

        ModelsCommand::List => {
            println!("Model: {} ({})", config.model.name, config.model.repo);
            println!("  Directory: {}\n", paths.dir.display());

            for file in MODEL_FILES {
                let status = if paths.dir.join(file.local_name).exists() {
                    "ready"
                } else {
                    "not installed"
                };
                println!("    - {:20} {:16} {}", file.local_name, file.label, status);
            }

            if !paths.is_complete() {
                println!("\nRun `folio models download` to fetch missing files.");
            }
        }

        ModelsCommand::Path => {
            println!("{}", paths.dir.display());
        }
    }

    Ok(())
}
