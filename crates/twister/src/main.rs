//! Twister CLI binary.
//!
//! - Generate a twist tree from story instructions
//! - Send one-shot completions
//! - Upload generated trees and publish them

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, complete_prompt, generate_story, init_logging, publish_receipt, upload_tree,
    };

    // Secrets may live in a local .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => twister::TwisterConfig::from_file(path)?,
        None => twister::TwisterConfig::load()?,
    };
    let _logging = init_logging(cli.verbose, cli.json_logs, &config)?;

    match cli.command {
        Commands::Generate(args) => generate_story(&args, &config).await?,
        Commands::Complete { prompt, json } => complete_prompt(&prompt, json, &config).await?,
        Commands::Upload {
            input,
            receipt,
            publish,
        } => upload_tree(&input, receipt.as_deref(), publish, &config).await?,
        Commands::Publish { input } => publish_receipt(&input, &config).await?,
    }

    Ok(())
}
