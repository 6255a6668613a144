pub mod blocks;
pub mod collect;
pub mod config;
pub mod generate;
pub mod load_config;
pub mod model;
pub mod parse;
pub mod prompt;
pub mod publish;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use generate::generate;
use load_config::load_config;
use model::AnthropicClient;
use publish::NotionClient;

/// CLI for docscribe: generate and publish feature documentation.
#[derive(Parser)]
#[clap(
    name = "docscribe",
    version,
    about = "Document source-tree features with an LLM and publish the result to a Notion workspace"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Document all configured features using the given config file
    Generate {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main().
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate { config } => {
            let config = load_config(config)?;
            let model = AnthropicClient::new(&config.model);
            let store = NotionClient::new(
                config.workspace.api_key.clone(),
                config.workspace.database_id.clone(),
            );

            println!("Documentation run starting...");
            let report = generate(&config, &model, &store).await?;

            println!("Documentation run complete.\nReport:");
            for feature in &report.features {
                match (&feature.page_id, &feature.error) {
                    (Some(page_id), _) => println!(
                        "  [ok]   {} ({} files, page {})",
                        feature.feature_name, feature.files_processed, page_id
                    ),
                    (None, Some(error)) => {
                        println!("  [fail] {}: {}", feature.feature_name, error)
                    }
                    (None, None) => println!("  [?]    {}", feature.feature_name),
                }
            }
            println!("Estimated cost: ${:.2}", report.estimated_cost);
            Ok(())
        }
    }
}
