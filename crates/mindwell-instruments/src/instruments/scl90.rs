use std::collections::BTreeMap;
use std::sync::LazyLock;

use mindwell_core::models::AnswerSet;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::engine::{self, Aggregation, Gate, SummaryIndices};
use crate::error::InstrumentError;
use crate::policy::ScoringPolicy;
use crate::scoring::{Domain, FactorDef, Item, Question, ScoreRange};
use crate::Instrument;

/// SCL-90: Symptom Checklist-90.
/// 90 items rated 1 (not at all) to 5 (extremely), grouped into 9 symptom
/// dimensions plus an "other" group of sleep/appetite items.
pub struct Scl90;

pub const ID: &str = "scl90";

pub const QUESTION_COUNT: usize = 90;

pub const ANSWER_RANGE: ScoreRange = ScoreRange { min: 1, max: 5 };

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Scl90Factor {
    Somatization,
    Obsessive,
    Interpersonal,
    Depression,
    Anxiety,
    Hostility,
    Phobic,
    Paranoid,
    Psychoticism,
    /// Catch-all group; never ranked as a symptom.
    Other,
}

impl Scl90Factor {
    pub const ALL: [Scl90Factor; 10] = [
        Scl90Factor::Somatization,
        Scl90Factor::Obsessive,
        Scl90Factor::Interpersonal,
        Scl90Factor::Depression,
        Scl90Factor::Anxiety,
        Scl90Factor::Hostility,
        Scl90Factor::Phobic,
        Scl90Factor::Paranoid,
        Scl90Factor::Psychoticism,
        Scl90Factor::Other,
    ];

    pub fn definition(self) -> &'static FactorDef<Scl90Factor> {
        // FACTORS is declared in the same order as the enum.
        &FACTORS[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.definition().id
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }
}

pub static FACTORS: [FactorDef<Scl90Factor>; 10] = [
    FactorDef {
        key: Scl90Factor::Somatization,
        id: "somatization",
        name: "Somatization",
        description: "Bodily discomfort such as headaches, chest tightness and muscle aches",
        question_ids: &[1, 4, 12, 27, 40, 42, 48, 49, 52, 53, 56, 58],
        normal_range: Some((1.0, 1.5)),
    },
    FactorDef {
        key: Scl90Factor::Obsessive,
        id: "obsessive",
        name: "Obsessive-Compulsive",
        description: "Repeated checking and thoughts or actions that are hard to shake off",
        question_ids: &[3, 9, 10, 28, 38, 45, 46, 51, 55, 65],
        normal_range: Some((1.0, 1.6)),
    },
    FactorDef {
        key: Scl90Factor::Interpersonal,
        id: "interpersonal",
        name: "Interpersonal Sensitivity",
        description: "Feelings of inferiority and over-concern with how others judge you",
        question_ids: &[6, 21, 34, 36, 37, 41, 61, 69, 73],
        normal_range: Some((1.0, 1.6)),
    },
    FactorDef {
        key: Scl90Factor::Depression,
        id: "depression",
        name: "Depression",
        description: "Low mood, loss of interest and hopelessness",
        question_ids: &[5, 14, 15, 20, 22, 26, 29, 30, 31, 32, 54, 71, 79],
        normal_range: Some((1.0, 1.5)),
    },
    FactorDef {
        key: Scl90Factor::Anxiety,
        id: "anxiety",
        name: "Anxiety",
        description: "Tension, worry, fear and restlessness",
        question_ids: &[2, 17, 23, 33, 39, 57, 72, 78, 80, 86],
        normal_range: Some((1.0, 1.4)),
    },
    FactorDef {
        key: Scl90Factor::Hostility,
        id: "hostility",
        name: "Hostility",
        description: "Irritability, impulsive outbursts, breaking things and arguing",
        question_ids: &[11, 24, 63, 67, 74, 81],
        normal_range: Some((1.0, 1.5)),
    },
    FactorDef {
        key: Scl90Factor::Phobic,
        id: "phobic",
        name: "Phobic Anxiety",
        description: "Fear and avoidance of specific things or places",
        question_ids: &[13, 25, 47, 50, 70, 75, 82],
        normal_range: Some((1.0, 1.3)),
    },
    FactorDef {
        key: Scl90Factor::Paranoid,
        id: "paranoid",
        name: "Paranoid Ideation",
        description: "Suspiciousness, feeling persecuted, ideas of reference",
        question_ids: &[8, 18, 43, 68, 76, 83],
        normal_range: Some((1.0, 1.4)),
    },
    FactorDef {
        key: Scl90Factor::Psychoticism,
        id: "psychoticism",
        name: "Psychoticism",
        description: "Sense of thought control, hallucinations, social withdrawal",
        question_ids: &[7, 16, 35, 62, 77, 84, 85, 87, 88, 90],
        normal_range: Some((1.0, 1.3)),
    },
    FactorDef {
        key: Scl90Factor::Other,
        id: "other",
        name: "Other",
        description: "Sleep and appetite problems",
        question_ids: &[19, 44, 59, 60, 64, 66, 89],
        normal_range: Some((1.0, 1.5)),
    },
];

#[rustfmt::skip]
static ITEMS: [Item<Scl90Factor>; QUESTION_COUNT] = {
    use Scl90Factor::*;
    [
        Item { id: 1, factor: Somatization, text: "Headaches" },
        Item { id: 2, factor: Anxiety, text: "Nervousness or shakiness inside" },
        Item { id: 3, factor: Obsessive, text: "Unwanted thoughts or words that keep circling in your mind" },
        Item { id: 4, factor: Somatization, text: "Faintness or dizziness" },
        Item { id: 5, factor: Depression, text: "Loss of interest in the opposite sex" },
        Item { id: 6, factor: Interpersonal, text: "Feeling critical of others" },
        Item { id: 7, factor: Psychoticism, text: "The idea that someone else can control your thoughts" },
        Item { id: 8, factor: Paranoid, text: "Blaming others for your troubles" },
        Item { id: 9, factor: Obsessive, text: "Trouble remembering things" },
        Item { id: 10, factor: Obsessive, text: "Worrying about the neatness of your clothes and appearance" },
        Item { id: 11, factor: Hostility, text: "Feeling easily annoyed or irritated" },
        Item { id: 12, factor: Somatization, text: "Pains in the chest" },
        Item { id: 13, factor: Phobic, text: "Feeling afraid in open spaces or on the streets" },
        Item { id: 14, factor: Depression, text: "Feeling low in energy or slowed down" },
        Item { id: 15, factor: Depression, text: "Thoughts of ending your life" },
        Item { id: 16, factor: Psychoticism, text: "Hearing voices that other people do not hear" },
        Item { id: 17, factor: Anxiety, text: "Trembling" },
        Item { id: 18, factor: Paranoid, text: "Feeling that most people cannot be trusted" },
        Item { id: 19, factor: Other, text: "Poor appetite" },
        Item { id: 20, factor: Depression, text: "Crying easily" },
        Item { id: 21, factor: Interpersonal, text: "Feeling shy or uneasy with the opposite sex" },
        Item { id: 22, factor: Depression, text: "Feeling tricked, trapped or that someone wants to catch you" },
        Item { id: 23, factor: Anxiety, text: "Suddenly feeling scared for no reason" },
        Item { id: 24, factor: Hostility, text: "Temper outbursts you could not control" },
        Item { id: 25, factor: Phobic, text: "Feeling afraid to go out of your house" },
        Item { id: 26, factor: Depression, text: "Blaming yourself for things" },
        Item { id: 27, factor: Somatization, text: "Pains in the lower back" },
        Item { id: 28, factor: Obsessive, text: "Feeling blocked in getting things done" },
        Item { id: 29, factor: Depression, text: "Feeling lonely" },
        Item { id: 30, factor: Depression, text: "Feeling blue" },
        Item { id: 31, factor: Depression, text: "Worrying too much about things" },
        Item { id: 32, factor: Depression, text: "Feeling no interest in things" },
        Item { id: 33, factor: Anxiety, text: "Feeling fearful" },
        Item { id: 34, factor: Interpersonal, text: "Your feelings being easily hurt" },
        Item { id: 35, factor: Psychoticism, text: "Other people being aware of your private thoughts" },
        Item { id: 36, factor: Interpersonal, text: "Feeling that others do not understand you or are unsympathetic" },
        Item { id: 37, factor: Interpersonal, text: "Feeling that people are unfriendly or dislike you" },
        Item { id: 38, factor: Obsessive, text: "Having to do things very slowly to make sure they are right" },
        Item { id: 39, factor: Anxiety, text: "Heart pounding or racing" },
        Item { id: 40, factor: Somatization, text: "Nausea or upset stomach" },
        Item { id: 41, factor: Interpersonal, text: "Feeling inferior to others" },
        Item { id: 42, factor: Somatization, text: "Soreness of your muscles" },
        Item { id: 43, factor: Paranoid, text: "Feeling that you are watched or talked about by others" },
        Item { id: 44, factor: Other, text: "Sleeping lightly or restlessly" },
        Item { id: 45, factor: Obsessive, text: "Having to wash your hands or count things over and over" },
        Item { id: 46, factor: Obsessive, text: "Having to check and double-check what you do" },
        Item { id: 47, factor: Phobic, text: "Feeling afraid to travel on buses, subways or trains" },
        Item { id: 48, factor: Somatization, text: "Trouble getting your breath" },
        Item { id: 49, factor: Somatization, text: "Hot or cold spells" },
        Item { id: 50, factor: Phobic, text: "Avoiding certain things, places or activities because they frighten you" },
        Item { id: 51, factor: Obsessive, text: "Your mind going blank" },
        Item { id: 52, factor: Somatization, text: "Numbness or tingling in parts of your body" },
        Item { id: 53, factor: Somatization, text: "A lump in your throat" },
        Item { id: 54, factor: Depression, text: "Feeling hopeless about the future" },
        Item { id: 55, factor: Obsessive, text: "Trouble making decisions" },
        Item { id: 56, factor: Somatization, text: "Feeling weak in parts of your body" },
        Item { id: 57, factor: Anxiety, text: "Feeling tense or keyed up" },
        Item { id: 58, factor: Somatization, text: "Heavy feelings in your arms or legs" },
        Item { id: 59, factor: Other, text: "Thoughts of death or dying" },
        Item { id: 60, factor: Other, text: "Overeating" },
        Item { id: 61, factor: Interpersonal, text: "Feeling uneasy when people are watching or talking about you" },
        Item { id: 62, factor: Psychoticism, text: "Having thoughts that are not your own" },
        Item { id: 63, factor: Hostility, text: "Having urges to beat, injure or harm someone" },
        Item { id: 64, factor: Other, text: "Awakening in the early morning" },
        Item { id: 65, factor: Obsessive, text: "Having to repeat actions such as touching or counting" },
        Item { id: 66, factor: Other, text: "Poor sleep" },
        Item { id: 67, factor: Hostility, text: "Having urges to break or smash things" },
        Item { id: 68, factor: Paranoid, text: "Having ideas or beliefs that others do not share" },
        Item { id: 69, factor: Interpersonal, text: "Feeling uneasy in crowds" },
        Item { id: 70, factor: Phobic, text: "Feeling uneasy in shops or at the cinema" },
        Item { id: 71, factor: Depression, text: "Feeling everything is an effort" },
        Item { id: 72, factor: Anxiety, text: "Spells of terror or panic" },
        Item { id: 73, factor: Interpersonal, text: "Feeling uncomfortable eating in public" },
        Item { id: 74, factor: Hostility, text: "Getting into frequent arguments" },
        Item { id: 75, factor: Phobic, text: "Feeling nervous when you are left alone" },
        Item { id: 76, factor: Paranoid, text: "Others not giving you proper credit for your achievements" },
        Item { id: 77, factor: Psychoticism, text: "Feeling lonely even when you are with people" },
        Item { id: 78, factor: Anxiety, text: "Feeling so restless you could not sit still" },
        Item { id: 79, factor: Depression, text: "Feelings of worthlessness" },
        Item { id: 80, factor: Anxiety, text: "The feeling that something bad is going to happen" },
        Item { id: 81, factor: Hostility, text: "Shouting or throwing things" },
        Item { id: 82, factor: Phobic, text: "Feeling afraid you will faint in public" },
        Item { id: 83, factor: Paranoid, text: "Feeling that people will take advantage of you" },
        Item { id: 84, factor: Psychoticism, text: "Having thoughts about sex that bother you a lot" },
        Item { id: 85, factor: Psychoticism, text: "The idea that you should be punished for your wrongdoings" },
        Item { id: 86, factor: Anxiety, text: "Frightening thoughts and images" },
        Item { id: 87, factor: Psychoticism, text: "The idea that something serious is wrong with your body" },
        Item { id: 88, factor: Psychoticism, text: "Never feeling close to another person" },
        Item { id: 89, factor: Other, text: "Feelings of guilt" },
        Item { id: 90, factor: Psychoticism, text: "The idea that something is wrong with your mind" },
    ]
};

/// Overall severity, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityLevel {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl SeverityLevel {
    pub fn label(self) -> &'static str {
        match self {
            SeverityLevel::Normal => "Good mental health",
            SeverityLevel::Mild => "Mild psychological distress",
            SeverityLevel::Moderate => "Moderate psychological distress",
            SeverityLevel::Severe => "Needs professional attention",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SeverityLevel::Normal => {
                "Overall mental health looks good. Keep up a positive lifestyle."
            }
            SeverityLevel::Mild => {
                "There may be some mild distress. Paying attention to self-care is recommended."
            }
            SeverityLevel::Moderate => {
                "Consider seeing a counselor or talking with someone you trust."
            }
            SeverityLevel::Severe => {
                "Seeking professional counseling or medical help soon is strongly recommended."
            }
        }
    }
}

/// Display band for a single factor score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FactorLevel {
    Normal,
    Elevated,
    High,
    VeryHigh,
}

impl FactorLevel {
    pub fn for_score(score: f64) -> Self {
        if score < 1.5 {
            FactorLevel::Normal
        } else if score < 2.0 {
            FactorLevel::Elevated
        } else if score < 3.0 {
            FactorLevel::High
        } else {
            FactorLevel::VeryHigh
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Scl90Result {
    /// Mean answer per factor, 2 decimals.
    pub factor_scores: BTreeMap<Scl90Factor, f64>,
    pub total_score: u32,
    pub positive_count: u32,
    pub positive_score_avg: f64,
    pub gsi: f64,
    pub severity_level: SeverityLevel,
    pub primary_symptom: Option<Scl90Factor>,
    pub secondary_symptom: Option<Scl90Factor>,
}

impl Scl90Result {
    pub fn factor_score(&self, factor: Scl90Factor) -> f64 {
        self.factor_scores.get(&factor).copied().unwrap_or_default()
    }

    pub fn factor_level(&self, factor: Scl90Factor) -> FactorLevel {
        FactorLevel::for_score(self.factor_score(factor))
    }

    /// Factors scoring at or above `threshold`, highest first.
    pub fn high_factors(&self, threshold: f64) -> Vec<(Scl90Factor, f64)> {
        let mut high: Vec<(Scl90Factor, f64)> = self
            .factor_scores
            .iter()
            .filter(|(_, score)| **score >= threshold)
            .map(|(factor, score)| (*factor, *score))
            .collect();
        high.sort_by(|a, b| b.1.total_cmp(&a.1));
        high
    }

    /// Format the result as markdown for the interpretation model's prompt.
    /// Factors at or above `symptom_threshold` are flagged.
    pub fn to_structured_input(&self, symptom_threshold: f64) -> String {
        let max_total = QUESTION_COUNT as u32 * u32::from(ANSWER_RANGE.max);
        let mut output = String::from("## SCL-90\n\n### Overall\n");
        output.push_str(&format!("- Total score: {}/{max_total}\n", self.total_score));
        output.push_str(&format!("- Global severity index (GSI): {:.2}\n", self.gsi));
        output.push_str(&format!(
            "- Positive items: {}/{QUESTION_COUNT}\n",
            self.positive_count
        ));
        output.push_str(&format!(
            "- Positive item average: {:.2}\n",
            self.positive_score_avg
        ));
        output.push_str(&format!("- Severity: {}\n\n", self.severity_level.label()));

        output.push_str("### Factor scores\n");
        for (factor, score) in &self.factor_scores {
            let flag = if *score >= symptom_threshold { " (!)" } else { "" };
            output.push_str(&format!("- {}: {score:.2}{flag}\n", factor.name()));
        }
        output.push('\n');

        output.push_str("### Standout factors\n");
        match self.primary_symptom {
            Some(primary) => output.push_str(&format!(
                "- Primary: {} ({})\n",
                primary.name(),
                primary.definition().description
            )),
            None => output.push_str("- No standout factor\n"),
        }
        if let Some(secondary) = self.secondary_symptom {
            output.push_str(&format!(
                "- Secondary: {} ({})\n",
                secondary.name(),
                secondary.definition().description
            ));
        }
        output
    }
}

impl Scl90 {
    /// All 90 questions, ordered by id.
    pub fn items() -> &'static [Item<Scl90Factor>] {
        &ITEMS
    }

    pub fn factor_for_question(question_id: u32) -> Option<Scl90Factor> {
        ITEMS
            .iter()
            .find(|item| item.id == question_id)
            .map(|item| item.factor)
    }

    /// Score a completed answer set.
    pub fn assess(
        &self,
        answers: &AnswerSet,
        policy: &ScoringPolicy,
    ) -> Result<Scl90Result, InstrumentError> {
        let fill = self.prepare_answers(answers, policy.missing_answers)?;
        let thresholds = &policy.scl90;

        // Below-scale answers score like unanswered items in the factor means.
        let scored: AnswerSet = answers
            .iter()
            .map(|(id, value)| (id, if value < ANSWER_RANGE.min { fill } else { value }))
            .collect();
        let factor_scores = engine::aggregate(&FACTORS, &scored, fill, Aggregation::Mean);
        let indices =
            SummaryIndices::compute(answers, QUESTION_COUNT, thresholds.positive_threshold);
        let severity_level = thresholds.severity.classify(
            indices.total_score,
            indices.positive_count,
            indices.gsi,
        );
        let gate = Gate::AtLeast(thresholds.symptom_threshold);
        let ranking = engine::rank(&factor_scores, Some(Scl90Factor::Other), gate, gate);

        tracing::debug!(
            total_score = indices.total_score,
            gsi = indices.gsi,
            severity = ?severity_level,
            "scored scl90 answer set"
        );

        Ok(Scl90Result {
            factor_scores: factor_scores.iter().collect(),
            total_score: indices.total_score,
            positive_count: indices.positive_count,
            positive_score_avg: indices.positive_score_avg,
            gsi: indices.gsi,
            severity_level,
            primary_symptom: ranking.primary,
            secondary_symptom: ranking.secondary,
        })
    }
}

impl Instrument for Scl90 {
    fn id(&self) -> &str {
        ID
    }

    fn name(&self) -> &str {
        "SCL-90"
    }

    fn answer_range(&self) -> ScoreRange {
        ANSWER_RANGE
    }

    fn domains(&self) -> &[Domain] {
        static DOMAINS: LazyLock<Vec<Domain>> =
            LazyLock::new(|| FACTORS.iter().map(Domain::from).collect());
        &DOMAINS
    }

    fn questions(&self) -> &[Question] {
        static QUESTIONS: LazyLock<Vec<Question>> = LazyLock::new(|| {
            ITEMS
                .iter()
                .map(|item| Question {
                    id: item.id,
                    text: item.text.to_string(),
                    domain_id: item.factor.id().to_string(),
                })
                .collect()
        });
        &QUESTIONS
    }

    fn score(
        &self,
        answers: &AnswerSet,
        policy: &ScoringPolicy,
    ) -> Result<serde_json::Value, InstrumentError> {
        Ok(serde_json::to_value(self.assess(answers, policy)?)?)
    }

    fn describe_result(
        &self,
        result: &serde_json::Value,
        policy: &ScoringPolicy,
    ) -> Result<String, InstrumentError> {
        let result: Scl90Result = serde_json::from_value(result.clone())?;
        Ok(result.to_structured_input(policy.scl90.symptom_threshold))
    }
}
