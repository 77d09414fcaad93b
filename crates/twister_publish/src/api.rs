//! The publishing service boundary.

use async_trait::async_trait;
use std::sync::Arc;
use twister_core::Twist;
use twister_error::TwisterResult;

/// Remote operations the [`Uploader`](crate::Uploader) needs.
///
/// Every method performs exactly one remote call and returns the remote hash
/// id where one is created.
#[async_trait]
pub trait PublishingApi: Send + Sync {
    /// Create a story from the root twist.
    async fn create_story(&self, twist: &Twist) -> TwisterResult<String>;

    /// Create an extra twist below the twist with remote id `parent_hash_id`.
    async fn create_twist(&self, parent_hash_id: &str, twist: &Twist) -> TwisterResult<String>;

    /// Publish an uploaded twist.
    async fn publish_twist(&self, hash_id: &str) -> TwisterResult<()>;
}

#[async_trait]
impl<A: PublishingApi + ?Sized> PublishingApi for Arc<A> {
    async fn create_story(&self, twist: &Twist) -> TwisterResult<String> {
        (**self).create_story(twist).await
    }

    async fn create_twist(&self, parent_hash_id: &str, twist: &Twist) -> TwisterResult<String> {
        (**self).create_twist(parent_hash_id, twist).await
    }

    async fn publish_twist(&self, hash_id: &str) -> TwisterResult<()> {
        (**self).publish_twist(hash_id).await
    }
}
