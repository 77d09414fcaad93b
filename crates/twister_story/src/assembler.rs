//! Merging sibling batches into the shared tree.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use twister_core::{StoryTree, Twist, TwistId};
use twister_error::{
    MalformedResponseError, MalformedResponseErrorKind, ValidationError, ValidationErrorKind,
};
use tracing::debug;

/// Appends batches to a shared [`StoryTree`].
///
/// Concurrent branches produce prefix-disjoint ids, so merging never resolves
/// conflicts; it only checks that every twist lands under an existing parent.
/// Clones share both the tree and the record of whether they merged its root.
#[derive(Debug, Clone, Default)]
pub struct TreeAssembler {
    tree: StoryTree,
    root_merged: Arc<AtomicBool>,
}

impl TreeAssembler {
    /// Assemble into `tree`. Clones of a `StoryTree` share storage.
    pub fn new(tree: StoryTree) -> Self {
        Self {
            tree,
            root_merged: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The tree being assembled.
    pub fn tree(&self) -> &StoryTree {
        &self.tree
    }

    /// Merge the root twist.
    ///
    /// # Errors
    ///
    /// [`ValidationErrorKind::TreeNotEmpty`] if the tree already has a root that
    /// this assembler did not put there. The existing root is kept.
    pub fn merge_root(&self, twist: Twist) -> Result<(), ValidationError> {
        if !self.tree.insert(TwistId::root(), twist) {
            return Err(ValidationError::new(ValidationErrorKind::TreeNotEmpty(
                self.tree.len(),
            )));
        }
        self.root_merged.store(true, Ordering::Release);
        Ok(())
    }

    /// Whether this assembler, or a clone of it, merged the root.
    pub fn root_merged(&self) -> bool {
        self.root_merged.load(Ordering::Acquire)
    }

    /// Merge the sibling batch of `parent`.
    ///
    /// Returns the number of twists inserted.
    ///
    /// # Errors
    ///
    /// [`MalformedResponseErrorKind::MissingParent`] if `parent` is not in the tree
    /// or a twist in the batch is not its direct child. Nothing is merged then.
    pub fn merge_batch(
        &self,
        parent: &TwistId,
        batch: Vec<(TwistId, Twist)>,
    ) -> Result<usize, MalformedResponseError> {
        if !self.tree.contains(parent) {
            return Err(MalformedResponseError::new(
                MalformedResponseErrorKind::MissingParent(parent.to_string()),
            ));
        }
        if let Some((stray, _)) = batch
            .iter()
            .find(|(id, _)| id.parent().as_ref() != Some(parent))
        {
            return Err(MalformedResponseError::new(
                MalformedResponseErrorKind::MissingParent(stray.to_string()),
            ));
        }

        let merged = self.tree.merge(batch);
        debug!(parent = %parent, merged, total = self.tree.len(), "Merged sibling batch");
        Ok(merged)
    }

    /// Merge a chain starting at `start`, each twist the only child of the previous one.
    ///
    /// Returns the ids assigned: `start`, `start + "0"`, `start + "00"`, ...
    /// A chain starting at the root merges its first twist through
    /// [`merge_root`](Self::merge_root).
    ///
    /// # Examples
    ///
    /// ```
    /// use twister_core::{StoryTree, Twist, TwistId};
    /// use twister_story::TreeAssembler;
    ///
    /// let assembler = TreeAssembler::new(StoryTree::new());
    /// let ids = assembler
    ///     .merge_chain(
    ///         TwistId::root(),
    ///         vec![Twist::new("a", "1"), Twist::new("b", "2"), Twist::new("c", "3")],
    ///     )
    ///     .unwrap();
    /// assert!(assembler.root_merged());
    /// let ids: Vec<String> = ids.into_iter().map(String::from).collect();
    /// assert_eq!(ids, vec!["0", "00", "000"]);
    /// ```
    ///
    /// # Errors
    ///
    /// As [`merge_root`](Self::merge_root), before anything is merged.
    pub fn merge_chain(
        &self,
        start: TwistId,
        twists: Vec<Twist>,
    ) -> Result<Vec<TwistId>, ValidationError> {
        let mut ids = Vec::with_capacity(twists.len());
        let mut next = start;
        for twist in twists {
            let child = next.child(0);
            if next.is_root() {
                self.merge_root(twist)?;
            } else {
                self.tree.insert(next.clone(), twist);
            }
            ids.push(next);
            next = child;
        }
        Ok(ids)
    }

    /// Consume the assembler, returning the tree handle.
    pub fn into_tree(self) -> StoryTree {
        self.tree
    }
}
