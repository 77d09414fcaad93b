//! Twist identifiers and content.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use twister_error::{ValidationError, ValidationErrorKind};

/// Hierarchical address of a twist.
///
/// A string of decimal digits starting with `0`. The root is `"0"`; every other id is its
/// parent's id with one more trailing digit, so the path from the root is encoded
/// in the id itself and ids of different branches never collide.
///
/// Ids order by length first and lexically second, which is breadth-first order:
/// every parent sorts before all of its descendants.
///
/// # Examples
///
/// ```
/// use twister_core::TwistId;
///
/// let root = TwistId::root();
/// let child = root.child(1);
///
/// assert_eq!(child.as_str(), "01");
/// assert_eq!(child.parent(), Some(root.clone()));
/// assert_eq!(child.depth(), 1);
/// assert!(root < child);
/// assert!(TwistId::parse("0a").is_err());
/// assert!(TwistId::parse("10").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(try_from = "String", into = "String")]
pub struct TwistId(String);

impl TwistId {
    /// The root twist, `"0"`.
    pub fn root() -> Self {
        Self("0".to_string())
    }

    /// Parse and validate an id.
    ///
    /// Every id descends from the root, so it must start with `'0'`.
    pub fn parse(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if !id.starts_with('0') || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::new(ValidationErrorKind::InvalidTwistId(id)));
        }
        Ok(Self(id))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Depth in the tree; the root is depth 0.
    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    /// Whether this is the story root, `"0"`.
    pub fn is_root(&self) -> bool {
        self.0 == "0"
    }

    /// The parent id: this id minus its last digit. `None` for the root.
    pub fn parent(&self) -> Option<TwistId> {
        if self.is_root() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_string()))
        }
    }

    /// The id of the `index`-th child.
    ///
    /// The index is appended as text, not added numerically. Indices of ten or more
    /// append several digits; callers cap branching below ten to keep
    /// [`TwistId::parent`] exact.
    pub fn child(&self, index: u32) -> TwistId {
        Self(format!("{}{}", self.0, index))
    }

    /// The ids of the first `count` children, in order.
    pub fn children(&self, count: u32) -> Vec<TwistId> {
        (0..count).map(|i| self.child(i)).collect()
    }

    /// Whether `self` lies on the path from the root to `other` (inclusive).
    pub fn is_ancestor_of(&self, other: &TwistId) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl Ord for TwistId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for TwistId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<String> for TwistId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for TwistId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TwistId> for String {
    fn from(id: TwistId) -> Self {
        id.0
    }
}

/// One node of the story: a title and a body.
///
/// Titles are asked to stay within 80 characters and bodies within 1200, but
/// the bounds are only stated in prompts; nothing here enforces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Twist {
    /// Short heading, often suggesting the reader's choice
    pub title: String,
    /// The fragment of the story
    pub body: String,
}

impl Twist {
    /// Advisory title length.
    pub const TITLE_LIMIT: usize = 80;
    /// Advisory body length.
    pub const BODY_LIMIT: usize = 1200;

    /// Create a twist.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}
