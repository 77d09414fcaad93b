//! Command-line interface module.

mod commands;
mod complete;
mod generate;
mod logging;
mod upload;

pub use commands::{Cli, Commands, GenerateArgs};
pub use complete::complete_prompt;
pub use generate::generate_story;
pub use logging::init_logging;
pub use upload::{publish_receipt, upload_tree};

use serde::Serialize;
use std::path::Path;

/// Pretty-print `value` to `output`, or to stdout when no path is given.
pub(crate) fn write_json<T: Serialize>(
    value: &T,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(path = %path.display(), "Output written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
