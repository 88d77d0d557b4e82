//! Camera constraint profiles and the degradation ladder.

use partscan_core::{CameraConfig, FacingMode};
use serde::{Deserialize, Serialize};

/// Bounds and preferred value for one frame dimension.
///
/// `min`/`max` are hard constraints a device may reject; `ideal` is a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRange {
    /// Hard lower bound
    pub min: Option<u32>,
    /// Preferred value
    pub ideal: Option<u32>,
    /// Hard upper bound
    pub max: Option<u32>,
}

impl DimensionRange {
    /// Range with all three values set.
    #[must_use]
    pub fn bounded(min: u32, ideal: u32, max: u32) -> Self {
        Self {
            min: Some(min),
            ideal: Some(ideal),
            max: Some(max),
        }
    }

    /// Range carrying only the preferred value.
    #[must_use]
    pub fn ideal(ideal: u32) -> Self {
        Self {
            min: None,
            ideal: Some(ideal),
            max: None,
        }
    }

    fn strictness(&self) -> u32 {
        u32::from(self.min.is_some()) + u32::from(self.max.is_some())
    }
}

/// Constraint set handed to the decoder when acquiring a camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintProfile {
    /// Position in the ladder, 0 is the strictest
    pub rank: usize,
    /// Camera-facing preference
    pub facing: Option<FacingMode>,
    /// Frame width constraint
    pub width: Option<DimensionRange>,
    /// Frame height constraint
    pub height: Option<DimensionRange>,
}

impl ConstraintProfile {
    /// True when nothing beyond "a camera is required" is asked for.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.facing.is_none() && self.width.is_none() && self.height.is_none()
    }

    /// Relative strictness used to check the ladder is monotonic.
    ///
    /// A facing preference outweighs all resolution bounds together; each hard
    /// bound counts one and any ideal hint counts one.
    #[must_use]
    pub fn strictness(&self) -> u32 {
        let facing = if self.facing.is_some() { 5 } else { 0 };
        let bounds: u32 = [self.width, self.height]
            .iter()
            .flatten()
            .map(DimensionRange::strictness)
            .sum();
        let hinted = [self.width, self.height]
            .iter()
            .flatten()
            .any(|d| d.ideal.is_some());
        facing + bounds + u32::from(hinted)
    }

    /// Label for the camera view badge.
    #[must_use]
    pub fn mode_label(&self) -> &'static str {
        match self.facing {
            Some(facing) => facing.label(),
            None if self.is_unconstrained() => "Basic Mode",
            None => "Any Camera",
        }
    }
}

/// Which constraints a rung keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rung {
    facing: bool,
    width: Option<DimensionRange>,
    height: Option<DimensionRange>,
}

/// Ordered, strictly relaxing sequence of constraint profiles.
///
/// The last rung is always unconstrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintLadder {
    rungs: Vec<Rung>,
}

impl Default for ConstraintLadder {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl ConstraintLadder {
    /// Build the four-rung ladder from camera settings.
    #[must_use]
    pub fn from_config(config: &CameraConfig) -> Self {
        let width = DimensionRange::bounded(config.min_width, config.ideal_width, config.max_width);
        let height =
            DimensionRange::bounded(config.min_height, config.ideal_height, config.max_height);

        Self {
            rungs: vec![
                Rung {
                    facing: true,
                    width: Some(width),
                    height: Some(height),
                },
                Rung {
                    facing: true,
                    width: None,
                    height: None,
                },
                Rung {
                    facing: false,
                    width: Some(DimensionRange::ideal(config.ideal_width)),
                    height: Some(DimensionRange::ideal(config.ideal_height)),
                },
                Rung {
                    facing: false,
                    width: None,
                    height: None,
                },
            ],
        }
    }

    /// Number of rungs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rungs.len()
    }

    /// Always false; a ladder has at least the unconstrained rung.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rungs.is_empty()
    }

    /// Highest valid rank.
    #[must_use]
    pub fn max_rank(&self) -> usize {
        self.rungs.len().saturating_sub(1)
    }

    /// Profile at `rank` for the given facing; ranks past the end clamp to
    /// the last rung.
    #[must_use]
    pub fn profile(&self, rank: usize, facing: FacingMode) -> ConstraintProfile {
        let rank = rank.min(self.max_rank());
        let rung = self.rungs[rank];
        ConstraintProfile {
            rank,
            facing: rung.facing.then_some(facing),
            width: rung.width,
            height: rung.height,
        }
    }
}
