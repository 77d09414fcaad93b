//! Generation policies: one engine, parameterized per variant.

use serde::{Deserialize, Serialize};
use twister_error::{ValidationError, ValidationErrorKind};
use twister_rate_limit::{GenerationConfig, MAX_BRANCHING};

/// How many children each node receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchingPolicy {
    /// Every sibling batch has the requested branching factor.
    Constant,
    /// The root's batch uses the requested factor; a node at depth `d >= 1`
    /// receives `width` children while `d <= until_depth` and one child after.
    Decaying {
        /// Deepest parent level still fanning out at `width`
        until_depth: u32,
        /// Children per node near the root
        width: u32,
    },
}

impl BranchingPolicy {
    /// Fan out at two until depth three, then go linear.
    pub fn decaying() -> Self {
        Self::Decaying {
            until_depth: 3,
            width: 2,
        }
    }

    /// Decaying policy with the `[generation]` configuration values.
    pub fn decaying_from_config(config: &GenerationConfig) -> Self {
        Self::Decaying {
            until_depth: config.decay_until_depth,
            width: config.decayed_branching,
        }
    }

    /// Children requested for a node at `parent_depth`.
    ///
    /// # Examples
    ///
    /// ```
    /// use twister_story::BranchingPolicy;
    ///
    /// let policy = BranchingPolicy::decaying();
    /// assert_eq!(policy.children_of(0, 3), 3);
    /// assert_eq!(policy.children_of(3, 3), 2);
    /// assert_eq!(policy.children_of(4, 3), 1);
    /// assert_eq!(BranchingPolicy::Constant.children_of(4, 3), 3);
    /// ```
    pub fn children_of(&self, parent_depth: u32, requested: u32) -> u32 {
        match *self {
            BranchingPolicy::Constant => requested,
            BranchingPolicy::Decaying { until_depth, width } => {
                if parent_depth == 0 {
                    requested
                } else if parent_depth <= until_depth {
                    width
                } else {
                    1
                }
            }
        }
    }
}

/// Whether prompts carry narrative-stage hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePolicy {
    /// Plain prompts at every depth.
    #[default]
    None,
    /// Ask for the climax at the climax depth and the resolution at the last level.
    ClimaxResolution,
}

/// How the tree is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeStrategy {
    /// Root call, then one call per internal node, expanding concurrently.
    Recursive,
    /// One JSON call describing the whole tree.
    SingleShot,
    /// One free-text story split into a chain of paragraphs.
    Linear,
    /// A linear chain that forks into alternative continuations after one paragraph.
    SemiLinear {
        /// Zero-based paragraph index after which the story forks
        split_at: u32,
        /// Continuations at the fork, the original one included (1 to 3)
        branches: u32,
    },
}

/// What the caller receives when generation fails part-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The underlying error propagates unchanged.
    #[default]
    Abort,
    /// The error is wrapped in a `PartialTreeError` carrying whatever was merged.
    /// Failures before the root is merged still propagate unchanged.
    ReturnPartial,
}

/// The full set of knobs distinguishing one generation variant from another.
///
/// # Examples
///
/// ```
/// use twister_story::{BranchingPolicy, FailurePolicy, GenerationPolicy, StagePolicy};
///
/// let policy = GenerationPolicy::v3().with_failure(FailurePolicy::ReturnPartial);
/// assert_eq!(policy.branching, BranchingPolicy::decaying());
/// assert_eq!(policy.stages, StagePolicy::ClimaxResolution);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationPolicy {
    /// Children per node
    pub branching: BranchingPolicy,
    /// Narrative-stage hints
    pub stages: StagePolicy,
    /// Tree construction
    pub strategy: TreeStrategy,
    /// Failure reporting
    pub failure: FailurePolicy,
}

impl GenerationPolicy {
    /// Constant branching, no stage hints, recursive expansion.
    pub fn baseline() -> Self {
        Self {
            branching: BranchingPolicy::Constant,
            stages: StagePolicy::None,
            strategy: TreeStrategy::Recursive,
            failure: FailurePolicy::Abort,
        }
    }

    /// Decaying branching without stage hints.
    pub fn v2() -> Self {
        Self {
            branching: BranchingPolicy::decaying(),
            ..Self::baseline()
        }
    }

    /// Decaying branching with climax and resolution hints.
    ///
    /// Pair with a `CallThrottle` on the generator for long trees.
    pub fn v3() -> Self {
        Self {
            stages: StagePolicy::ClimaxResolution,
            ..Self::v2()
        }
    }

    /// The whole tree from one JSON call.
    pub fn single_shot() -> Self {
        Self {
            strategy: TreeStrategy::SingleShot,
            ..Self::baseline()
        }
    }

    /// A single chain of paragraphs.
    pub fn linear() -> Self {
        Self {
            strategy: TreeStrategy::Linear,
            ..Self::baseline()
        }
    }

    /// A chain forking into three continuations after its third paragraph.
    pub fn semi_linear() -> Self {
        Self {
            strategy: TreeStrategy::SemiLinear {
                split_at: 2,
                branches: 3,
            },
            ..Self::baseline()
        }
    }

    /// Replace the failure policy.
    pub fn with_failure(mut self, failure: FailurePolicy) -> Self {
        self.failure = failure;
        self
    }

    /// Replace the branching policy.
    pub fn with_branching(mut self, branching: BranchingPolicy) -> Self {
        self.branching = branching;
        self
    }

    /// Reject policies that cannot produce a consistent tree.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let TreeStrategy::SemiLinear { branches, .. } = self.strategy {
            if !(1..=3).contains(&branches) {
                return Err(ValidationError::new(
                    ValidationErrorKind::InvalidBranchCount(branches),
                ));
            }
        }
        if let BranchingPolicy::Decaying { width, .. } = self.branching {
            if width == 0 {
                return Err(ValidationError::new(ValidationErrorKind::ZeroBranching));
            }
            if width > MAX_BRANCHING {
                return Err(ValidationError::new(
                    ValidationErrorKind::BranchingTooWide {
                        requested: width,
                        max: MAX_BRANCHING,
                    },
                ));
            }
        }
        Ok(())
    }
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Named presets, as accepted on the command line.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use twister_story::{GenerationPolicy, GenerationVariant};
///
/// let variant = GenerationVariant::from_str("semi-linear").unwrap();
/// assert_eq!(GenerationPolicy::from(variant), GenerationPolicy::semi_linear());
/// assert_eq!(GenerationVariant::SingleShot.to_string(), "single-shot");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GenerationVariant {
    /// [`GenerationPolicy::baseline`]
    Baseline,
    /// [`GenerationPolicy::v2`]
    V2,
    /// [`GenerationPolicy::v3`]
    #[default]
    V3,
    /// [`GenerationPolicy::single_shot`]
    SingleShot,
    /// [`GenerationPolicy::linear`]
    Linear,
    /// [`GenerationPolicy::semi_linear`]
    SemiLinear,
}

impl From<GenerationVariant> for GenerationPolicy {
    fn from(variant: GenerationVariant) -> Self {
        match variant {
            GenerationVariant::Baseline => GenerationPolicy::baseline(),
            GenerationVariant::V2 => GenerationPolicy::v2(),
            GenerationVariant::V3 => GenerationPolicy::v3(),
            GenerationVariant::SingleShot => GenerationPolicy::single_shot(),
            GenerationVariant::Linear => GenerationPolicy::linear(),
            GenerationVariant::SemiLinear => GenerationPolicy::semi_linear(),
        }
    }
}
