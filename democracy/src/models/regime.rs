//! Regime categories.
//!
//! The index is split into four ordinal bands. Lower bounds are inclusive:
//!
//! | Category           | Index        |
//! |--------------------|--------------|
//! | `FullDemocracy`    | ≥ 8.0        |
//! | `FlawedDemocracy`  | ≥ 6.0, < 8.0 |
//! | `HybridRegime`     | ≥ 4.0, < 6.0 |
//! | `Authoritarian`    | < 4.0        |

use serde::{Deserialize, Serialize};
use std::fmt;

const FULL_DEMOCRACY_MIN: f64 = 8.0;
const FLAWED_DEMOCRACY_MIN: f64 = 6.0;
const HYBRID_REGIME_MIN: f64 = 4.0;

/// Regime type, ordered from least to most democratic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegimeCategory {
    #[serde(rename = "Authoritarian")]
    Authoritarian,
    #[serde(rename = "Hybrid regime")]
    HybridRegime,
    #[serde(rename = "Flawed democracy")]
    FlawedDemocracy,
    #[serde(rename = "Full democracy")]
    FullDemocracy,
}

impl RegimeCategory {
    /// All categories in ordinal order.
    pub const ALL: [RegimeCategory; 4] = [
        Self::Authoritarian,
        Self::HybridRegime,
        Self::FlawedDemocracy,
        Self::FullDemocracy,
    ];

    /// Category for an index value.
    ///
    /// Total over `f64`: anything below 4.0 (NaN included) is authoritarian.
    pub fn classify(index: f64) -> Self {
        if index >= FULL_DEMOCRACY_MIN {
            Self::FullDemocracy
        } else if index >= FLAWED_DEMOCRACY_MIN {
            Self::FlawedDemocracy
        } else if index >= HYBRID_REGIME_MIN {
            Self::HybridRegime
        } else {
            Self::Authoritarian
        }
    }

    /// Display label, as used by the source table.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Authoritarian => "Authoritarian",
            Self::HybridRegime => "Hybrid regime",
            Self::FlawedDemocracy => "Flawed democracy",
            Self::FullDemocracy => "Full democracy",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == normalized)
    }

    /// Position in [`Self::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for RegimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
