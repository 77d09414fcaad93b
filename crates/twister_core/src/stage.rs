//! Narrative stages attached to tree depths.

use serde::{Deserialize, Serialize};

/// The narrative beat a level of the tree should carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum NarrativeStage {
    /// Setting up and developing the story
    #[display("exposition")]
    Exposition,
    /// The turning point
    #[display("climax")]
    Climax,
    /// The ending
    #[display("resolution")]
    Resolution,
}

/// Depths at which the climax and the resolution land for a given tree depth.
///
/// # Examples
///
/// ```
/// use twister_core::{NarrativeStage, StageMarkers};
///
/// let markers = StageMarkers::from_max_depth(5);
/// assert_eq!(markers.climax_depth, 2);
/// assert_eq!(markers.resolution_depth, 4);
/// assert_eq!(markers.stage_at(2), NarrativeStage::Climax);
/// assert_eq!(markers.stage_at(3), NarrativeStage::Exposition);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageMarkers {
    /// `floor((max_depth - 1) / 2)`
    pub climax_depth: u32,
    /// `max_depth - 1`
    pub resolution_depth: u32,
}

impl StageMarkers {
    /// Compute the markers. A `max_depth` of zero is treated as one.
    pub fn from_max_depth(max_depth: u32) -> Self {
        let last = max_depth.saturating_sub(1);
        Self {
            climax_depth: last / 2,
            resolution_depth: last,
        }
    }

    /// Stage for `depth`. Resolution is checked after climax and wins when both coincide.
    pub fn stage_at(&self, depth: u32) -> NarrativeStage {
        let mut stage = NarrativeStage::Exposition;
        if depth == self.climax_depth {
            stage = NarrativeStage::Climax;
        }
        if depth == self.resolution_depth {
            stage = NarrativeStage::Resolution;
        }
        stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_level_tree_resolves_at_root() {
        let markers = StageMarkers::from_max_depth(1);
        assert_eq!(markers.climax_depth, 0);
        assert_eq!(markers.resolution_depth, 0);
        assert_eq!(markers.stage_at(0), NarrativeStage::Resolution);
    }

    #[test]
    fn two_level_tree() {
        let markers = StageMarkers::from_max_depth(2);
        assert_eq!(markers.stage_at(0), NarrativeStage::Climax);
        assert_eq!(markers.stage_at(1), NarrativeStage::Resolution);
    }

    #[test]
    fn deep_tree_has_exposition_between_markers() {
        let markers = StageMarkers::from_max_depth(8);
        assert_eq!(markers.climax_depth, 3);
        assert_eq!(markers.resolution_depth, 7);
        let stages: Vec<_> = (0..8).map(|d| markers.stage_at(d)).collect();
        assert_eq!(
            stages.iter().filter(|s| **s == NarrativeStage::Exposition).count(),
            6
        );
    }
}
