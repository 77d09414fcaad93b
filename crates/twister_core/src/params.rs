//! Parameters of one generation request.

use crate::StageMarkers;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use twister_error::{ValidationError, ValidationErrorKind};

/// What the story should be about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryInstructions {
    /// Free-form narrative instructions, e.g. "a haunted lighthouse"
    Freeform(String),
    /// Legacy genre and topic pair
    GenreTopic {
        /// Comma-separated genres
        genres: String,
        /// Comma-separated topics
        topics: String,
    },
}

impl StoryInstructions {
    /// Whether the instructions carry no usable text.
    pub fn is_blank(&self) -> bool {
        match self {
            StoryInstructions::Freeform(text) => text.trim().is_empty(),
            StoryInstructions::GenreTopic { genres, topics } => {
                genres.trim().is_empty() || topics.trim().is_empty()
            }
        }
    }
}

impl From<&str> for StoryInstructions {
    fn from(text: &str) -> Self {
        StoryInstructions::Freeform(text.to_string())
    }
}

impl From<String> for StoryInstructions {
    fn from(text: String) -> Self {
        StoryInstructions::Freeform(text)
    }
}

/// Configuration describing one generation request.
///
/// # Examples
///
/// ```
/// use twister_core::GenerationParameters;
///
/// let params = GenerationParameters::builder()
///     .instructions("a haunted lighthouse")
///     .branching_factor(2u32)
///     .max_depth(2u32)
///     .build()
///     .unwrap();
///
/// assert!(params.validate(10).is_ok());
/// assert_eq!(*params.max_depth(), 2);
/// assert_eq!(params.extra(), &None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct GenerationParameters {
    /// Story subject
    instructions: StoryInstructions,
    /// Children requested for the root's sibling batch (and every batch, under a constant policy)
    branching_factor: u32,
    /// Number of levels in the finished tree, the root level included
    max_depth: u32,
    /// Additional constraints appended to the root prompt
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    extra: Option<String>,
}

impl GenerationParameters {
    /// Start building parameters.
    pub fn builder() -> GenerationParametersBuilder {
        GenerationParametersBuilder::default()
    }

    /// Reject parameters that cannot produce a consistent tree.
    ///
    /// `max_branching` caps the branching factor; ten or fewer keeps every child
    /// index a single digit.
    pub fn validate(&self, max_branching: u32) -> Result<(), ValidationError> {
        if self.instructions.is_blank() {
            return Err(ValidationError::new(ValidationErrorKind::MissingInstructions));
        }
        if self.branching_factor == 0 {
            return Err(ValidationError::new(ValidationErrorKind::ZeroBranching));
        }
        if self.branching_factor > max_branching {
            return Err(ValidationError::new(
                ValidationErrorKind::BranchingTooWide {
                    requested: self.branching_factor,
                    max: max_branching,
                },
            ));
        }
        if self.max_depth == 0 {
            return Err(ValidationError::new(ValidationErrorKind::ZeroDepth));
        }
        Ok(())
    }

    /// Climax and resolution depths derived from `max_depth`.
    pub fn stage_markers(&self) -> StageMarkers {
        StageMarkers::from_max_depth(self.max_depth)
    }
}

impl From<GenerationParametersBuilderError> for ValidationError {
    #[track_caller]
    fn from(err: GenerationParametersBuilderError) -> Self {
        ValidationError::new(ValidationErrorKind::MissingField(err.to_string()))
    }
}
