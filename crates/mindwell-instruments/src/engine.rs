//! Generic weighted-factor scorer.
//!
//! Both instruments share the same pipeline: answers are combined per factor
//! (`aggregate`), summarized across the whole bank (`SummaryIndices`), and
//! factors are ranked into primary/secondary slots (`rank`). Instruments
//! differ only in their factor tables, aggregation method and gates.

use mindwell_core::models::AnswerSet;

use crate::scoring::FactorDef;

/// Round to 2 decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// How member answers of a factor combine into one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Arithmetic mean, rounded to 2 decimals.
    Mean,
    /// Plain sum of answers.
    Sum,
    /// Sum as a whole-number percentage of the maximum possible sum.
    Percent { item_max: u8 },
}

impl Aggregation {
    fn combine(self, sum: u32, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let sum = f64::from(sum);
        let count = count as f64;
        match self {
            Aggregation::Mean => round2(sum / count),
            Aggregation::Sum => sum,
            Aggregation::Percent { item_max } => (sum / (count * f64::from(item_max)) * 100.0).round(),
        }
    }
}

/// Per-factor scores in the factor table's declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorScores<F>(Vec<(F, f64)>);

impl<F: Copy + PartialEq> FactorScores<F> {
    pub fn get(&self, key: F) -> Option<f64> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, score)| *score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, f64)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F> FromIterator<(F, f64)> for FactorScores<F> {
    fn from_iter<I: IntoIterator<Item = (F, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Score every factor in `table`. Questions absent from `answers` count as
/// `fill`.
pub fn aggregate<F: Copy>(
    table: &[FactorDef<F>],
    answers: &AnswerSet,
    fill: u8,
    method: Aggregation,
) -> FactorScores<F> {
    table
        .iter()
        .map(|def| {
            let sum: u32 = def
                .question_ids
                .iter()
                .map(|id| u32::from(answers.get(*id).unwrap_or(fill)))
                .sum();
            (def.key, method.combine(sum, def.question_ids.len()))
        })
        .collect()
}

/// Whole-bank summary statistics over the answers actually present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryIndices {
    pub total_score: u32,
    /// Global severity index: `total_score / question_count`, 2 decimals.
    pub gsi: f64,
    pub positive_count: u32,
    /// Mean of positive answers, 2 decimals; 0 when there are none.
    pub positive_score_avg: f64,
}

impl SummaryIndices {
    pub fn compute(answers: &AnswerSet, question_count: usize, positive_threshold: u8) -> Self {
        let total_score: u32 = answers.values().map(u32::from).sum();
        let gsi = if question_count == 0 {
            0.0
        } else {
            round2(f64::from(total_score) / question_count as f64)
        };

        let (positive_count, positive_sum) = answers
            .values()
            .filter(|value| *value >= positive_threshold)
            .fold((0u32, 0u32), |(count, sum), value| (count + 1, sum + u32::from(value)));
        let positive_score_avg = if positive_count > 0 {
            round2(f64::from(positive_sum) / f64::from(positive_count))
        } else {
            0.0
        };

        Self {
            total_score,
            gsi,
            positive_count,
            positive_score_avg,
        }
    }
}

/// Admission rule for a ranking slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    Open,
    AtLeast(f64),
    Above(f64),
}

impl Gate {
    pub fn admits(self, score: f64) -> bool {
        match self {
            Gate::Open => true,
            Gate::AtLeast(min) => score >= min,
            Gate::Above(min) => score > min,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranking<F> {
    pub primary: Option<F>,
    pub secondary: Option<F>,
}

/// Rank factors by descending score and fill the primary and secondary
/// slots. Ties keep declared order. Each slot is gated independently: a
/// secondary can be admitted even when the primary is not.
pub fn rank<F: Copy + PartialEq>(
    scores: &FactorScores<F>,
    excluded: Option<F>,
    primary_gate: Gate,
    secondary_gate: Gate,
) -> Ranking<F> {
    let mut ranked: Vec<(F, f64)> = scores
        .iter()
        .filter(|(key, _)| Some(*key) != excluded)
        .collect();
    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let slot = |index: usize, gate: Gate| {
        ranked
            .get(index)
            .filter(|(_, score)| gate.admits(*score))
            .map(|(key, _)| *key)
    };

    Ranking {
        primary: slot(0, primary_gate),
        secondary: slot(1, secondary_gate),
    }
}
