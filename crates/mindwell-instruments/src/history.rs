//! Views over past SCL-90 results: the flat row shape used for storage, the
//! change report between two sittings and the long-run trend of one user.

use std::collections::BTreeMap;

use mindwell_core::models::AssessmentRecord;
use mindwell_core::models::assessment::user_history;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::engine::round2;
use crate::error::InstrumentError;
use crate::instruments::scl90::{self, Scl90Factor, Scl90Result, SeverityLevel};

/// Factor changes smaller than this (in either direction) count as stable.
pub const CHANGE_THRESHOLD: f64 = 0.2;

/// GSI movement since the first sitting beyond which a trend is marked.
pub const MARKED_TREND_THRESHOLD: f64 = 0.5;

/// One SCL-90 result flattened to one column per factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Scl90Row {
    pub somatization_score: f64,
    pub obsessive_score: f64,
    pub interpersonal_score: f64,
    pub depression_score: f64,
    pub anxiety_score: f64,
    pub hostility_score: f64,
    pub phobic_score: f64,
    pub paranoid_score: f64,
    pub psychoticism_score: f64,
    pub other_score: f64,
    pub total_score: u32,
    pub positive_count: u32,
    pub positive_score_avg: f64,
    pub gsi: f64,
    pub severity_level: SeverityLevel,
    pub primary_symptom: Option<Scl90Factor>,
    pub secondary_symptom: Option<Scl90Factor>,
}

impl From<&Scl90Result> for Scl90Row {
    fn from(result: &Scl90Result) -> Self {
        let score = |factor| result.factor_score(factor);
        Self {
            somatization_score: score(Scl90Factor::Somatization),
            obsessive_score: score(Scl90Factor::Obsessive),
            interpersonal_score: score(Scl90Factor::Interpersonal),
            depression_score: score(Scl90Factor::Depression),
            anxiety_score: score(Scl90Factor::Anxiety),
            hostility_score: score(Scl90Factor::Hostility),
            phobic_score: score(Scl90Factor::Phobic),
            paranoid_score: score(Scl90Factor::Paranoid),
            psychoticism_score: score(Scl90Factor::Psychoticism),
            other_score: score(Scl90Factor::Other),
            total_score: result.total_score,
            positive_count: result.positive_count,
            positive_score_avg: result.positive_score_avg,
            gsi: result.gsi,
            severity_level: result.severity_level,
            primary_symptom: result.primary_symptom,
            secondary_symptom: result.secondary_symptom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Trend {
    Improved,
    Stable,
    Worsened,
}

impl Trend {
    /// Lower symptom scores are better, so a drop is an improvement.
    pub fn from_change(change: f64) -> Self {
        if change < -CHANGE_THRESHOLD {
            Trend::Improved
        } else if change > CHANGE_THRESHOLD {
            Trend::Worsened
        } else {
            Trend::Stable
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FactorChange {
    pub factor: Scl90Factor,
    pub current: f64,
    pub previous: f64,
    pub change: f64,
    /// Relative change in percent; 0 when the previous score was 0.
    pub change_percent: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Scl90Comparison {
    pub gsi_change: f64,
    pub gsi_trend: Trend,
    pub positive_count_change: i64,
    pub previous_severity: SeverityLevel,
    pub current_severity: SeverityLevel,
    /// Every ranked factor in bank order; the catch-all factor is left out.
    pub factor_changes: Vec<FactorChange>,
}

impl Scl90Comparison {
    pub fn between(current: &Scl90Result, previous: &Scl90Result) -> Self {
        let factor_changes = Scl90Factor::ALL
            .into_iter()
            .filter(|factor| *factor != Scl90Factor::Other)
            .map(|factor| {
                let now = current.factor_score(factor);
                let before = previous.factor_score(factor);
                let change = round2(now - before);
                let change_percent = if before > 0.0 {
                    round2((now - before) / before * 100.0)
                } else {
                    0.0
                };
                FactorChange {
                    factor,
                    current: now,
                    previous: before,
                    change,
                    change_percent,
                    trend: Trend::from_change(change),
                }
            })
            .collect();

        let gsi_change = round2(current.gsi - previous.gsi);
        Self {
            gsi_change,
            gsi_trend: Trend::from_change(gsi_change),
            positive_count_change: i64::from(current.positive_count)
                - i64::from(previous.positive_count),
            previous_severity: previous.severity_level,
            current_severity: current.severity_level,
            factor_changes,
        }
    }

    /// Factors that dropped noticeably, largest drop first.
    pub fn improved(&self) -> Vec<&FactorChange> {
        let mut improved: Vec<&FactorChange> = self
            .factor_changes
            .iter()
            .filter(|c| c.trend == Trend::Improved)
            .collect();
        improved.sort_by(|a, b| a.change.total_cmp(&b.change));
        improved
    }

    /// Factors that rose noticeably, largest rise first.
    pub fn worsened(&self) -> Vec<&FactorChange> {
        let mut worsened: Vec<&FactorChange> = self
            .factor_changes
            .iter()
            .filter(|c| c.trend == Trend::Worsened)
            .collect();
        worsened.sort_by(|a, b| b.change.total_cmp(&a.change));
        worsened
    }
}

/// Direction of the GSI between a user's first and latest sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TrendBand {
    ClearlyImproved,
    SomewhatImproved,
    Stable,
    SlightFluctuation,
    NeedsAttention,
}

impl TrendBand {
    pub fn from_gsi_change(change: f64) -> Self {
        if change < -MARKED_TREND_THRESHOLD {
            TrendBand::ClearlyImproved
        } else if change < 0.0 {
            TrendBand::SomewhatImproved
        } else if change > MARKED_TREND_THRESHOLD {
            TrendBand::NeedsAttention
        } else if change > 0.0 {
            TrendBand::SlightFluctuation
        } else {
            TrendBand::Stable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrendBand::ClearlyImproved => "Clearly improved",
            TrendBand::SomewhatImproved => "Somewhat improved",
            TrendBand::Stable => "Stable",
            TrendBand::SlightFluctuation => "Slight fluctuation",
            TrendBand::NeedsAttention => "Needs attention",
        }
    }

    /// One-sentence reading of a GSI change in this band.
    pub fn description(self, gsi_change: f64) -> String {
        let amount = gsi_change.abs();
        match self {
            TrendBand::ClearlyImproved => format!(
                "Compared with your first assessment your GSI fell by {amount:.2}. \
                 Your mental health has improved markedly."
            ),
            TrendBand::SomewhatImproved => format!(
                "Compared with your first assessment your GSI fell by {amount:.2}. \
                 Keep up the positive habits."
            ),
            TrendBand::Stable => {
                "Your mental health has held steady. Keep up the positive habits.".to_string()
            }
            TrendBand::SlightFluctuation => format!(
                "Compared with your first assessment your GSI rose by {amount:.2}. \
                 This may be a passing fluctuation, so just stay aware of it."
            ),
            TrendBand::NeedsAttention => format!(
                "Compared with your first assessment your GSI rose by {amount:.2}. \
                 Keep an eye on how you have been feeling lately."
            ),
        }
    }
}

/// One sitting in a trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrendPoint {
    pub taken_at: jiff::Timestamp,
    pub gsi: f64,
    pub positive_count: u32,
    /// Ranked factors only; the catch-all factor is left out.
    pub factor_scores: BTreeMap<Scl90Factor, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Scl90Trend {
    pub first_gsi: f64,
    pub latest_gsi: f64,
    /// `latest_gsi - first_gsi`, 2 decimals.
    pub gsi_change: f64,
    pub band: TrendBand,
    /// Every sitting, oldest first.
    pub series: Vec<TrendPoint>,
}

impl Scl90Trend {
    /// Trend over `user_id`'s SCL-90 records. `None` with fewer than two.
    pub fn over(
        records: &[AssessmentRecord],
        user_id: Uuid,
    ) -> Result<Option<Self>, InstrumentError> {
        let series = user_history(records, user_id, scl90::ID)
            .into_iter()
            .map(|record| {
                let result: Scl90Result = record.result_as(scl90::ID)?;
                Ok(TrendPoint {
                    taken_at: record.created_at,
                    gsi: result.gsi,
                    positive_count: result.positive_count,
                    factor_scores: result
                        .factor_scores
                        .into_iter()
                        .filter(|(factor, _)| *factor != Scl90Factor::Other)
                        .collect(),
                })
            })
            .collect::<Result<Vec<_>, InstrumentError>>()?;

        let (first_gsi, latest_gsi) = match series.as_slice() {
            [first, .., latest] => (first.gsi, latest.gsi),
            _ => return Ok(None),
        };
        let gsi_change = round2(latest_gsi - first_gsi);

        Ok(Some(Self {
            first_gsi,
            latest_gsi,
            gsi_change,
            band: TrendBand::from_gsi_change(gsi_change),
            series,
        }))
    }

    /// Score of `factor` at each sitting, oldest first.
    pub fn factor_series(&self, factor: Scl90Factor) -> Vec<f64> {
        self.series
            .iter()
            .filter_map(|point| point.factor_scores.get(&factor).copied())
            .collect()
    }
}
