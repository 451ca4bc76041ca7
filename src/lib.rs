pub mod config;
pub mod document;
pub mod generate;
pub mod link;
pub mod load_config;
pub mod publish;
pub mod vcs;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use generate::CommandRunner;
use load_config::load_config;
use vcs::GitCli;

#[derive(Parser)]
#[clap(
    name = "wiki-publish",
    version,
    about = "Generate, transform and publish versioned API documentation to a Github wiki"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remove all documentation build folders (generation, versioned, wiki checkout)
    Clean {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Generate documentation and transform it into wiki pages, without publishing
    Document {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Run the full pipeline: clean, generate, transform, clone the wiki, copy, commit and push
    Publish {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Clean { config } => {
            let config = load_config(config)?;
            publish::clean(&config).map_err(anyhow::Error::msg)?;
            println!("Clean complete.");
            Ok(())
        }
        Commands::Document { config } => {
            let config = load_config(config)?;
            let generator = CommandRunner::new(&config.generator);
            println!("Document starting...");
            match publish::document(&config, &generator).await {
                Ok(files) => {
                    println!("Document complete.\nTransformed files:");
                    println!("{:#?}", files);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Documentation transformation failed: {}", e);
                    Err(anyhow::Error::msg(e))
                }
            }
        }
        Commands::Publish { config } => {
            let config = load_config(config)?;
            let generator = CommandRunner::new(&config.generator);
            let git = GitCli::new();
            println!("Publish starting...");
            match publish::publish(&config, &generator, &git).await {
                Ok(report) => {
                    println!("Publish complete.\nReport:");
                    println!("{:#?}", report);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Publication failed: {}", e);
                    Err(anyhow::Error::msg(e))
                }
            }
        }
    }
}
