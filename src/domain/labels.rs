//! Closed label sets used by the annotation corpus.
//!
//! Screen conditions and cross-reference similarity grades arrive as string
//! attributes and are parsed into closed enums. Unknown labels are rejected:
//! the corpus schema fixes both sets, so an unrecognized value means the
//! annotation tree is structurally broken.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised when a label string is not part of its closed set.
#[derive(Debug, Error)]
#[error("unknown {kind} label '{value}'")]
pub struct UnknownLabel {
    kind: &'static str,
    value: String,
}

/// The recording condition of a screen on a video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenCondition {
    /// The screen is fully visible and shows the projected document.
    Normal,
    /// The screen displays windowed content.
    Windowed,
    /// The screen is obscured by an obstacle.
    Obstacle,
}

impl ScreenCondition {
    /// Returns the label string used by the annotation schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenCondition::Normal => "normal",
            ScreenCondition::Windowed => "windowed",
            ScreenCondition::Obstacle => "obstacle",
        }
    }
}

impl FromStr for ScreenCondition {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(ScreenCondition::Normal),
            "windowed" => Ok(ScreenCondition::Windowed),
            "obstacle" => Ok(ScreenCondition::Obstacle),
            _ => Err(UnknownLabel {
                kind: "screen condition",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ScreenCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The similarity grade of a cross-reference between a screen and a page.
///
/// `Full` marks a page the screen displays in its entirety; `Incremental`
/// marks a page of which only an incremental build-up is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Similarity {
    /// The screen fully matches the referenced page.
    Full,
    /// The screen shows an incremental version of the referenced page.
    Incremental,
}

impl Similarity {
    /// Returns the label string used by the annotation schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Similarity::Full => "full",
            Similarity::Incremental => "incremental",
        }
    }
}

impl FromStr for Similarity {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Similarity::Full),
            "incremental" => Ok(Similarity::Incremental),
            _ => Err(UnknownLabel {
                kind: "similarity",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
