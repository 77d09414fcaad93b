//! Publishing collaborator for finished Twister story trees.
//!
//! A generated [`StoryTree`](twister_core::StoryTree) is uploaded to a
//! Story3-style publishing API: the root becomes a story, every other twist an
//! extra twist under its already-uploaded parent. The resulting
//! [`UploadReceipt`] maps twist ids to remote hash ids and can be published
//! later.
//!
//! # Example
//!
//! ```no_run
//! use twister_core::StoryTree;
//! use twister_publish::{Story3Client, Uploader};
//!
//! # async fn example(tree: StoryTree) -> Result<(), Box<dyn std::error::Error>> {
//! let client = Story3Client::new("https://story3.com/api/v2/")?;
//! let uploader = Uploader::new(client);
//! let receipt = uploader.upload(&tree).await?;
//! uploader.publish(&receipt).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod receipt;
mod story3;
mod uploader;

pub use api::PublishingApi;
pub use receipt::UploadReceipt;
pub use story3::Story3Client;
pub use uploader::Uploader;
