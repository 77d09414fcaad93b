//! Parent-before-child upload of a story tree.

use crate::{PublishingApi, UploadReceipt};
use tracing::{debug, info, instrument};
use twister_core::StoryTree;
use twister_error::{TwisterResult, ValidationError, ValidationErrorKind};

/// Walks a [`StoryTree`] against a [`PublishingApi`].
#[derive(Debug, Clone)]
pub struct Uploader<A> {
    api: A,
}

impl<A: PublishingApi> Uploader<A> {
    /// Wrap a publishing API.
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The wrapped API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Upload every twist, parents first.
    ///
    /// The root is created as a story; every other twist is created below its
    /// parent's remote id. Calls are sequential because each child needs its
    /// parent's hash id.
    ///
    /// # Errors
    ///
    /// Fails with [`ValidationErrorKind::OrphanTwist`] before any remote call
    /// when a twist's parent is absent, and propagates the first remote failure.
    #[instrument(skip_all, fields(twists = tree.len()))]
    pub async fn upload(&self, tree: &StoryTree) -> TwisterResult<UploadReceipt> {
        if let Some(orphan) = tree.missing_parents().into_iter().next() {
            return Err(
                ValidationError::new(ValidationErrorKind::OrphanTwist(orphan.to_string())).into(),
            );
        }

        let mut receipt = UploadReceipt::default();
        for (id, twist) in tree.upload_order() {
            let hash_id = match id.parent() {
                None => self.api.create_story(&twist).await?,
                Some(parent) => {
                    let parent_hash = receipt.hash_id(&parent).ok_or_else(|| {
                        ValidationError::new(ValidationErrorKind::OrphanTwist(id.to_string()))
                    })?;
                    self.api.create_twist(parent_hash, &twist).await?
                }
            };
            debug!(id = %id, hash_id = %hash_id, "Twist uploaded");
            receipt.record(id, hash_id);
        }

        info!(uploaded = receipt.len(), "Story uploaded");
        Ok(receipt)
    }

    /// Publish every twist in `receipt`, parents first.
    #[instrument(skip_all, fields(twists = receipt.len()))]
    pub async fn publish(&self, receipt: &UploadReceipt) -> TwisterResult<()> {
        for (id, hash_id) in receipt.iter() {
            self.api.publish_twist(hash_id).await?;
            debug!(id = %id, hash_id, "Twist published");
        }
        info!(published = receipt.len(), "Story published");
        Ok(())
    }
}
