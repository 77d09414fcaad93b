//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use twister::{
    GenerationParameters, GenerationVariant, StoryInstructions, TwisterResult, ValidationError,
};

/// Twister - generate branching interactive fiction with a language model
#[derive(Parser, Debug)]
#[command(name = "twister")]
#[command(about = "Generate branching interactive fiction with a language model", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Load configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a twist tree and print it as a flat JSON mapping
    Generate(GenerateArgs),

    /// Send a single prompt and print the raw reply
    Complete {
        /// Prompt text
        #[arg(long)]
        prompt: String,

        /// Ask for a JSON object
        #[arg(long)]
        json: bool,
    },

    /// Upload a generated tree file to the publishing API
    Upload {
        /// Path to a tree produced by `generate`
        #[arg(long)]
        input: PathBuf,

        /// Write the upload receipt here instead of stdout
        #[arg(long)]
        receipt: Option<PathBuf>,

        /// Publish every twist after uploading
        #[arg(long)]
        publish: bool,
    },

    /// Publish the twists listed in an upload receipt
    Publish {
        /// Path to a receipt produced by `upload`
        #[arg(long)]
        input: PathBuf,
    },
}

/// Arguments of `twister generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Free-form story instructions
    #[arg(long, conflicts_with_all = ["genres", "topics"])]
    pub instructions: Option<String>,

    /// Comma-separated genres (with --topics)
    #[arg(long, requires = "topics")]
    pub genres: Option<String>,

    /// Comma-separated topics (with --genres)
    #[arg(long, requires = "genres")]
    pub topics: Option<String>,

    /// Children requested per sibling batch
    #[arg(long, default_value_t = 2)]
    pub branching: u32,

    /// Levels in the finished tree, root included
    #[arg(long, default_value_t = 3)]
    pub depth: u32,

    /// Extra constraints appended to the opening prompt
    #[arg(long)]
    pub extra: Option<String>,

    /// Generation preset
    #[arg(long, default_value_t = GenerationVariant::V3)]
    pub variant: GenerationVariant,

    /// On failure, still write whatever part of the tree was generated
    #[arg(long)]
    pub partial: bool,

    /// Write the tree here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Story subject from the flags. Blank when neither form was given, which
    /// validation rejects before any remote call.
    pub fn instructions(&self) -> StoryInstructions {
        match (&self.instructions, &self.genres, &self.topics) {
            (Some(text), _, _) => StoryInstructions::Freeform(text.clone()),
            (None, Some(genres), Some(topics)) => StoryInstructions::GenreTopic {
                genres: genres.clone(),
                topics: topics.clone(),
            },
            _ => StoryInstructions::Freeform(String::new()),
        }
    }

    /// Build generation parameters from the flags.
    pub fn parameters(&self) -> TwisterResult<GenerationParameters> {
        let mut builder = GenerationParameters::builder();
        builder
            .instructions(self.instructions())
            .branching_factor(self.branching)
            .max_depth(self.depth);
        if let Some(extra) = &self.extra {
            builder.extra(extra.clone());
        }
        Ok(builder.build().map_err(ValidationError::from)?)
    }
}
