//! Physical layout family catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A physical layout family with canonical grid dimensions.
///
/// The grid dimensions are what the geometry synthesizers use when a
/// descriptor carries no physical positions; they are deliberately coarse
/// and say nothing about the real shape of an individual board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutFamily {
    /// Full-size board with function row, nav block and numpad.
    Full,
    /// Tenkeyless (full-size minus the numpad).
    Tenkeyless,
    /// Compact 75% arrangement.
    #[serde(rename = "75%")]
    SeventyFivePercent,
    /// 65% arrangement (no function row, keeps arrows).
    #[serde(rename = "65%")]
    SixtyFivePercent,
    /// Classic 60% arrangement.
    #[serde(rename = "60%")]
    SixtyPercent,
    /// Ortholinear grid.
    Ortholinear,
    /// Two-piece split ergonomic board.
    Split,
}

impl LayoutFamily {
    /// Canonical grid row count used when synthesizing this family.
    #[must_use]
    pub const fn rows(self) -> u8 {
        match self {
            Self::Full | Self::Tenkeyless | Self::SeventyFivePercent => 6,
            Self::SixtyFivePercent | Self::SixtyPercent => 5,
            Self::Ortholinear | Self::Split => 4,
        }
    }

    /// Canonical grid column count used when synthesizing this family.
    #[must_use]
    pub const fn cols(self) -> u8 {
        match self {
            Self::Full => 21,
            Self::Tenkeyless => 18,
            Self::SeventyFivePercent | Self::SixtyFivePercent => 16,
            Self::SixtyPercent => 14,
            Self::Ortholinear | Self::Split => 12,
        }
    }

    /// Human-readable family name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Tenkeyless => "tenkeyless",
            Self::SeventyFivePercent => "75%",
            Self::SixtyFivePercent => "65%",
            Self::SixtyPercent => "60%",
            Self::Ortholinear => "ortholinear",
            Self::Split => "split",
        }
    }
}

impl fmt::Display for LayoutFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
