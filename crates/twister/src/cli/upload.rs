//! `twister upload` and `twister publish` handlers.

use super::write_json;
use std::path::Path;
use tracing::info;
use twister::{Story3Client, StoryTree, TwisterConfig, UploadReceipt, Uploader};

/// Upload a tree file and write the receipt, optionally publishing right away.
pub async fn upload_tree(
    input: &Path,
    receipt_path: Option<&Path>,
    publish: bool,
    config: &TwisterConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let tree: StoryTree = serde_json::from_str(&std::fs::read_to_string(input)?)?;
    info!(path = %input.display(), twists = tree.len(), "Loaded story tree");

    let uploader = Uploader::new(Story3Client::from_config(&config.publish)?);
    let receipt = uploader.upload(&tree).await?;
    write_json(&receipt, receipt_path)?;

    if publish {
        uploader.publish(&receipt).await?;
    }
    Ok(())
}

/// Publish every twist listed in a receipt file.
pub async fn publish_receipt(
    input: &Path,
    config: &TwisterConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let receipt: UploadReceipt = serde_json::from_str(&std::fs::read_to_string(input)?)?;
    let uploader = Uploader::new(Story3Client::from_config(&config.publish)?);
    uploader.publish(&receipt).await?;
    Ok(())
}
