//! Mapping from uploaded twists to their remote ids.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use twister_core::TwistId;

/// Twist id to remote hash id, for every uploaded twist.
///
/// Serializes as a flat JSON object, so a receipt written by `twister upload`
/// can be read back by `twister publish`.
///
/// # Examples
///
/// ```
/// use twister_core::TwistId;
/// use twister_publish::UploadReceipt;
///
/// let mut receipt = UploadReceipt::default();
/// receipt.record(TwistId::root(), "a1b2");
///
/// assert_eq!(receipt.hash_id(&TwistId::root()), Some("a1b2"));
/// assert_eq!(serde_json::to_string(&receipt).unwrap(), r#"{"0":"a1b2"}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadReceipt {
    hash_ids: BTreeMap<TwistId, String>,
}

impl UploadReceipt {
    /// Record the remote id of an uploaded twist.
    pub fn record(&mut self, id: TwistId, hash_id: impl Into<String>) {
        self.hash_ids.insert(id, hash_id.into());
    }

    /// Remote id of `id`, if it was uploaded.
    pub fn hash_id(&self, id: &TwistId) -> Option<&str> {
        self.hash_ids.get(id).map(String::as_str)
    }

    /// Remote id of the story root.
    pub fn story_hash_id(&self) -> Option<&str> {
        self.hash_id(&TwistId::root())
    }

    /// Entries in parent-before-child order.
    pub fn iter(&self) -> impl Iterator<Item = (&TwistId, &str)> {
        self.hash_ids.iter().map(|(id, hash)| (id, hash.as_str()))
    }

    /// Number of uploaded twists.
    pub fn len(&self) -> usize {
        self.hash_ids.len()
    }

    /// Whether nothing was uploaded.
    pub fn is_empty(&self) -> bool {
        self.hash_ids.is_empty()
    }
}
