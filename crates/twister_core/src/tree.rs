//! The shared, concurrently-writable story tree.

use crate::{Twist, TwistId};
use dashmap::DashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;
use twister_error::{MalformedResponseError, MalformedResponseErrorKind};

/// Mapping from twist id to twist, written concurrently by sibling branches.
///
/// Cloning a `StoryTree` clones a handle: all clones see the same twists. This is
/// what lets every recursive expansion merge into one tree, and what lets a caller
/// keep a handle to observe a generation that later fails.
///
/// Ids produced by different branches are prefix-disjoint, so concurrent inserts
/// never target the same key and merging is append-only.
///
/// # Examples
///
/// ```
/// use twister_core::{StoryTree, Twist, TwistId};
///
/// let tree = StoryTree::new();
/// tree.insert(TwistId::root(), Twist::new("The Lighthouse", "The lamp went dark."));
/// tree.insert(TwistId::root().child(0), Twist::new("Climb", "You climb the stairs."));
///
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree.levels(), 2);
/// assert!(tree.missing_parents().is_empty());
///
/// let json = serde_json::to_value(&tree).unwrap();
/// assert_eq!(json["00"]["title"], "Climb");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoryTree {
    twists: Arc<DashMap<TwistId, Twist>>,
}

impl StoryTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a twist. Returns `false`, keeping the existing twist, when the id is taken.
    pub fn insert(&self, id: TwistId, twist: Twist) -> bool {
        match self.twists.entry(id) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                warn!(id = %entry.key(), "Twist already present, keeping the first one");
                false
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(twist);
                true
            }
        }
    }

    /// Insert a batch of twists, returning how many were new.
    pub fn merge(&self, batch: impl IntoIterator<Item = (TwistId, Twist)>) -> usize {
        batch
            .into_iter()
            .filter(|(id, twist)| self.insert(id.clone(), twist.clone()))
            .count()
    }

    /// Replace the title of an existing twist. Returns `false` if the id is absent.
    pub fn patch_title(&self, id: &TwistId, title: impl Into<String>) -> bool {
        match self.twists.get_mut(id) {
            Some(mut twist) => {
                twist.title = title.into();
                true
            }
            None => false,
        }
    }

    /// A copy of the twist at `id`.
    pub fn get(&self, id: &TwistId) -> Option<Twist> {
        self.twists.get(id).map(|t| t.value().clone())
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &TwistId) -> bool {
        self.twists.contains_key(id)
    }

    /// Number of twists.
    pub fn len(&self) -> usize {
        self.twists.len()
    }

    /// Whether the tree has no twists.
    pub fn is_empty(&self) -> bool {
        self.twists.is_empty()
    }

    /// Ordered copy of the tree: parents before children, siblings in index order.
    pub fn snapshot(&self) -> BTreeMap<TwistId, Twist> {
        self.twists
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Twists in an order where every parent precedes its children.
    ///
    /// This is the order a publishing API that needs the parent's remote id
    /// before creating a child must consume them in.
    pub fn upload_order(&self) -> Vec<(TwistId, Twist)> {
        self.snapshot().into_iter().collect()
    }

    /// Ids whose parent is not in the tree.
    pub fn missing_parents(&self) -> Vec<TwistId> {
        let snapshot = self.snapshot();
        snapshot
            .keys()
            .filter(|id| id.parent().is_some_and(|parent| !snapshot.contains_key(&parent)))
            .cloned()
            .collect()
    }

    /// Fail on the first twist whose parent is absent.
    pub fn check_parents(&self) -> Result<(), MalformedResponseError> {
        match self.missing_parents().into_iter().next() {
            Some(orphan) => Err(MalformedResponseError::new(
                MalformedResponseErrorKind::MissingParent(orphan.to_string()),
            )),
            None => Ok(()),
        }
    }

    /// Number of levels, the root level included. Zero for an empty tree.
    pub fn levels(&self) -> usize {
        self.twists
            .iter()
            .map(|entry| entry.key().depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of twists at each depth, index 0 being the root level.
    pub fn level_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.levels()];
        for entry in self.twists.iter() {
            sizes[entry.key().depth()] += 1;
        }
        sizes
    }

    /// The flat `id -> {title, body}` mapping as a JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .snapshot()
            .into_iter()
            .map(|(id, twist)| {
                let value = serde_json::json!({ "title": twist.title, "body": twist.body });
                (String::from(id), value)
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl From<BTreeMap<TwistId, Twist>> for StoryTree {
    fn from(twists: BTreeMap<TwistId, Twist>) -> Self {
        let tree = Self::new();
        tree.merge(twists);
        tree
    }
}

impl Serialize for StoryTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StoryTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<TwistId, Twist>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn twist(n: &str) -> Twist {
        Twist::new(format!("title {n}"), format!("body {n}"))
    }

    #[test]
    fn duplicate_insert_keeps_first() {
        let tree = StoryTree::new();
        assert!(tree.insert(TwistId::root(), twist("a")));
        assert!(!tree.insert(TwistId::root(), twist("b")));
        assert_eq!(tree.get(&TwistId::root()).unwrap().title, "title a");
    }

    #[test]
    fn upload_order_is_breadth_first() {
        let tree = StoryTree::new();
        for id in ["010", "0", "01", "00", "001", "011"] {
            tree.insert(TwistId::parse(id).unwrap(), twist(id));
        }
        let order: Vec<String> = tree
            .upload_order()
            .into_iter()
            .map(|(id, _)| id.to_string())
            .collect();
        assert_eq!(order, vec!["0", "00", "01", "001", "010", "011"]);
    }

    #[test]
    fn orphans_are_reported() {
        let tree = StoryTree::new();
        tree.insert(TwistId::root(), twist("0"));
        tree.insert(TwistId::parse("011").unwrap(), twist("011"));
        assert_eq!(tree.missing_parents(), vec![TwistId::parse("011").unwrap()]);
        assert!(tree.check_parents().is_err());
    }

    #[test]
    fn patch_title_only_touches_existing() {
        let tree = StoryTree::new();
        tree.insert(TwistId::root(), twist("0"));
        assert!(tree.patch_title(&TwistId::root(), "Renamed"));
        assert!(!tree.patch_title(&TwistId::root().child(0), "Nope"));
        assert_eq!(tree.get(&TwistId::root()).unwrap().title, "Renamed");
        assert_eq!(tree.get(&TwistId::root()).unwrap().body, "body 0");
    }

    #[test]
    fn level_sizes_count_each_depth() {
        let tree = StoryTree::new();
        for id in ["0", "00", "01", "000", "010"] {
            tree.insert(TwistId::parse(id).unwrap(), twist(id));
        }
        assert_eq!(tree.level_sizes(), vec![1, 2, 2]);
    }
}
