//! Types for quality scores.

use serde::{Deserialize, Serialize};

/// Resolution tier of a release. Ordered from worst to best.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Sd,
    Hd,
    Fhd,
    Uhd,
}

impl QualityTier {
    /// Base score contributed by the tier.
    pub fn base_score(&self) -> i32 {
        match self {
            QualityTier::Uhd => 100,
            QualityTier::Fhd => 75,
            QualityTier::Hd => 50,
            QualityTier::Sd => 25,
        }
    }

    /// Short tier name used in upgrade descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Uhd => "UHD",
            QualityTier::Fhd => "FHD",
            QualityTier::Hd => "HD",
            QualityTier::Sd => "SD",
        }
    }

    /// Display label, without the HDR suffix.
    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Uhd => "4K",
            QualityTier::Fhd => "1080p",
            QualityTier::Hd => "720p",
            QualityTier::Sd => "SD",
        }
    }

    pub fn color_hint(&self) -> ColorHint {
        match self {
            QualityTier::Uhd => ColorHint::Purple,
            QualityTier::Fhd => ColorHint::Blue,
            QualityTier::Hd => ColorHint::Green,
            QualityTier::Sd => ColorHint::Gray,
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badge color for the rendering host. Carries no ranking meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorHint {
    Gray,
    Green,
    Blue,
    Purple,
}

/// Derived quality of a single release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Monotonic with perceived quality. Never below the SD base.
    pub score: i32,
    pub level: QualityTier,
    /// Whether the release carries any HDR format.
    pub hdr: bool,
    pub label: String,
    pub color_hint: ColorHint,
}
