//! Tunable scoring policy.
//!
//! Every threshold the instruments apply lives here with its published
//! default, so deployments can adjust them from configuration. All structs
//! use `#[serde(default)]`: a partial policy file only overrides what it names.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::instruments::emotion_health::IndexLevel;
use crate::instruments::scl90::SeverityLevel;

/// What to do when an answer set does not cover the whole question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MissingAnswerPolicy {
    /// Score unanswered questions as the lowest value on the scale
    /// ("not present") and skip range validation.
    #[default]
    DefaultNeutral,
    /// Refuse to score incomplete or out-of-range answer sets.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct SeverityThresholds {
    /// Total score must be below this (together with the positive count
    /// gate) for a `normal` classification.
    pub normal_total_below: u32,
    pub normal_positive_below: u32,
    pub mild_gsi_below: f64,
    pub moderate_gsi_below: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            normal_total_below: 160,
            normal_positive_below: 43,
            mild_gsi_below: 2.0,
            moderate_gsi_below: 3.0,
        }
    }
}

impl SeverityThresholds {
    /// Classify overall severity. Order matters: the volume/breadth gate is
    /// checked before the GSI bands.
    pub fn classify(&self, total_score: u32, positive_count: u32, gsi: f64) -> SeverityLevel {
        if total_score < self.normal_total_below && positive_count < self.normal_positive_below {
            SeverityLevel::Normal
        } else if gsi < self.mild_gsi_below {
            SeverityLevel::Mild
        } else if gsi < self.moderate_gsi_below {
            SeverityLevel::Moderate
        } else {
            SeverityLevel::Severe
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct Scl90Thresholds {
    /// Answers at or above this value count as positive items.
    pub positive_threshold: u8,
    /// Minimum factor score for a primary/secondary symptom.
    pub symptom_threshold: f64,
    pub severity: SeverityThresholds,
}

impl Default for Scl90Thresholds {
    fn default() -> Self {
        Self {
            positive_threshold: 2,
            symptom_threshold: 2.0,
            severity: SeverityThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct EmotionHealthThresholds {
    pub index_medium_from: u32,
    pub index_high_from: u32,
}

impl Default for EmotionHealthThresholds {
    fn default() -> Self {
        Self {
            index_medium_from: 40,
            index_high_from: 70,
        }
    }
}

impl EmotionHealthThresholds {
    pub fn index_level(&self, value: u32) -> IndexLevel {
        if value < self.index_medium_from {
            IndexLevel::Low
        } else if value < self.index_high_from {
            IndexLevel::Medium
        } else {
            IndexLevel::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(export)]
pub struct ScoringPolicy {
    pub missing_answers: MissingAnswerPolicy,
    pub scl90: Scl90Thresholds,
    pub emotion_health: EmotionHealthThresholds,
}

impl ScoringPolicy {
    /// The default thresholds with incomplete answer sets rejected.
    pub fn strict() -> Self {
        Self {
            missing_answers: MissingAnswerPolicy::Reject,
            ..Self::default()
        }
    }
}
