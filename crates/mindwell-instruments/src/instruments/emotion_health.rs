use std::sync::LazyLock;

use mindwell_core::models::AnswerSet;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::engine::{self, Aggregation, Gate};
use crate::error::InstrumentError;
use crate::policy::{EmotionHealthThresholds, ScoringPolicy};
use crate::scoring::{Domain, FactorDef, Item, Question, ScoreRange};
use crate::Instrument;

/// Emotion Health: a 32-item, three-layer questionnaire.
///
/// Layer 1 (screening, 1-12) yields 0-100 energy/anxiety/stress indices.
/// Layer 2 (pattern, 13-28) identifies the dominant emotional reaction
/// pattern. Layer 3 (blockage, 29-32) is a direct vote for the dimension
/// most in need of work. Answers run 0 (almost never) to 3 (almost daily).
pub struct EmotionHealth;

pub const QUESTION_COUNT: usize = 32;

pub const ANSWER_RANGE: ScoreRange = ScoreRange { min: 0, max: 3 };

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionLayer {
    Screening,
    Pattern,
    Blockage,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum IndexType {
    Energy,
    Anxiety,
    Stress,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PatternType {
    Exhaustion,
    Tension,
    Suppression,
    Avoidance,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum BlockedDimension {
    Action,
    Emotion,
    Belief,
    Giving,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum IndexLevel {
    Low,
    Medium,
    High,
}

/// The factor a question feeds, tagged by layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmotionFactor {
    Index(IndexType),
    Pattern(PatternType),
    Blockage(BlockedDimension),
}

impl EmotionFactor {
    pub fn layer(self) -> QuestionLayer {
        match self {
            EmotionFactor::Index(_) => QuestionLayer::Screening,
            EmotionFactor::Pattern(_) => QuestionLayer::Pattern,
            EmotionFactor::Blockage(_) => QuestionLayer::Blockage,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            EmotionFactor::Index(index) => INDEX_FACTORS[index as usize].id,
            EmotionFactor::Pattern(pattern) => PATTERN_FACTORS[pattern as usize].id,
            EmotionFactor::Blockage(dimension) => BLOCKAGE_FACTORS[dimension as usize].id,
        }
    }
}

impl PatternType {
    pub fn name(self) -> &'static str {
        PATTERN_FACTORS[self as usize].name
    }
}

impl BlockedDimension {
    pub fn name(self) -> &'static str {
        BLOCKAGE_FACTORS[self as usize].name
    }

    pub fn block_point(self) -> &'static str {
        match self {
            BlockedDimension::Action => "Mind stuck on high alert",
            BlockedDimension::Emotion => "Emotional system overloaded",
            BlockedDimension::Belief => "Missing sense of self-worth",
            BlockedDimension::Giving => "Long-term energy overdraft",
        }
    }

    pub fn recommended_coach(self) -> &'static str {
        match self {
            BlockedDimension::Action => "Action Coach AI",
            BlockedDimension::Emotion => "Emotion Coach AI",
            BlockedDimension::Belief => "Self-Worth Rebuilding AI",
            BlockedDimension::Giving => "Energy Recovery AI",
        }
    }

    pub fn recommended_camp(self) -> &'static str {
        match self {
            BlockedDimension::Action => "Execution Training Camp",
            BlockedDimension::Emotion => "Emotion Journal Camp",
            BlockedDimension::Belief => "Belief Reshaping Camp",
            BlockedDimension::Giving => "Energy Nourishment Camp",
        }
    }

    pub fn recommended_path(self) -> String {
        format!("{} + {}", self.recommended_coach(), self.recommended_camp())
    }
}

// Each table is declared in the same order as its enum.

pub static INDEX_FACTORS: [FactorDef<IndexType>; 3] = [
    FactorDef {
        key: IndexType::Energy,
        id: "energy",
        name: "Emotional Energy",
        description: "Loss of interest, fatigue and low drive",
        question_ids: &[1, 2, 3, 4],
        normal_range: None,
    },
    FactorDef {
        key: IndexType::Anxiety,
        id: "anxiety",
        name: "Anxiety Tension",
        description: "Anticipatory worry and difficulty relaxing",
        question_ids: &[5, 6, 7, 8],
        normal_range: None,
    },
    FactorDef {
        key: IndexType::Stress,
        id: "stress",
        name: "Stress Load",
        description: "Feeling overloaded by duties and expectations",
        question_ids: &[9, 10, 11, 12],
        normal_range: None,
    },
];

pub static PATTERN_FACTORS: [FactorDef<PatternType>; 4] = [
    FactorDef {
        key: PatternType::Exhaustion,
        id: "exhaustion",
        name: "Energy Exhaustion",
        description: "Keeps pushing through and puts everyone else first",
        question_ids: &[13, 14, 15, 16],
        normal_range: None,
    },
    FactorDef {
        key: PatternType::Tension,
        id: "tension",
        name: "High Tension",
        description: "Strong need for control and constant self-pressure",
        question_ids: &[17, 18, 19, 20],
        normal_range: None,
    },
    FactorDef {
        key: PatternType::Suppression,
        id: "suppression",
        name: "Emotional Suppression",
        description: "Holds feelings in to keep the peace",
        question_ids: &[21, 22, 23, 24],
        normal_range: None,
    },
    FactorDef {
        key: PatternType::Avoidance,
        id: "avoidance",
        name: "Avoidance and Delay",
        description: "Procrastinates and escapes when pressure rises",
        question_ids: &[25, 26, 27, 28],
        normal_range: None,
    },
];

pub static BLOCKAGE_FACTORS: [FactorDef<BlockedDimension>; 4] = [
    FactorDef {
        key: BlockedDimension::Action,
        id: "action",
        name: "Getting Started",
        description: "Knows what to do but cannot start",
        question_ids: &[29],
        normal_range: None,
    },
    FactorDef {
        key: BlockedDimension::Emotion,
        id: "emotion",
        name: "Emotional Stability",
        description: "Emotions flood in and crowd out thinking",
        question_ids: &[30],
        normal_range: None,
    },
    FactorDef {
        key: BlockedDimension::Belief,
        id: "belief",
        name: "Self-Worth",
        description: "Persistent sense of not being good enough",
        question_ids: &[31],
        normal_range: None,
    },
    FactorDef {
        key: BlockedDimension::Giving,
        id: "giving",
        name: "Energy Replenishment",
        description: "Always giving out energy, rarely taking it in",
        question_ids: &[32],
        normal_range: None,
    },
];

#[rustfmt::skip]
static ITEMS: [Item<EmotionFactor>; QUESTION_COUNT] = {
    use BlockedDimension as B;
    use EmotionFactor::{Blockage, Index, Pattern};
    use IndexType as I;
    use PatternType as P;
    [
        Item { id: 1, factor: Index(I::Energy), text: "Over the past two weeks I have had little interest in many things" },
        Item { id: 2, factor: Index(I::Energy), text: "Even after resting it is hard to feel truly recovered" },
        Item { id: 3, factor: Index(I::Energy), text: "I often lack the drive to start anything new" },
        Item { id: 4, factor: Index(I::Energy), text: "I often feel powerless or quietly pessimistic about the future" },
        Item { id: 5, factor: Index(I::Anxiety), text: "I often worry in advance about things that might go wrong" },
        Item { id: 6, factor: Index(I::Anxiety), text: "Even when nothing is happening it is hard to truly relax" },
        Item { id: 7, factor: Index(I::Anxiety), text: "My mind rarely stops; I keep thinking about all sorts of things" },
        Item { id: 8, factor: Index(I::Anxiety), text: "Worry about failing keeps me from getting started" },
        Item { id: 9, factor: Index(I::Stress), text: "Recent responsibilities make me feel pushed along" },
        Item { id: 10, factor: Index(I::Stress), text: "There often seems to be too much to handle" },
        Item { id: 11, factor: Index(I::Stress), text: "Even when I try hard I feel I am not doing well enough" },
        Item { id: 12, factor: Index(I::Stress), text: "I feel I have to hold on and must not fall apart" },
        Item { id: 13, factor: Pattern(P::Exhaustion), text: "Under pressure I keep pushing and rarely rest" },
        Item { id: 14, factor: Pattern(P::Exhaustion), text: "I tend to meet other people's needs before my own" },
        Item { id: 15, factor: Pattern(P::Exhaustion), text: "I ignore my body's warning signs" },
        Item { id: 16, factor: Pattern(P::Exhaustion), text: "It has been a long time since I did something relaxing just for me" },
        Item { id: 17, factor: Pattern(P::Tension), text: "I have a strong need to control outcomes and details" },
        Item { id: 18, factor: Pattern(P::Tension), text: "When something goes wrong I blame myself first" },
        Item { id: 19, factor: Pattern(P::Tension), text: "Even when nobody is pushing me I put heavy pressure on myself" },
        Item { id: 20, factor: Pattern(P::Tension), text: "I find it hard to switch off, even while resting" },
        Item { id: 21, factor: Pattern(P::Suppression), text: "When I am unhappy I keep it to myself" },
        Item { id: 22, factor: Pattern(P::Suppression), text: "To keep the peace I often hold back how I really feel" },
        Item { id: 23, factor: Pattern(P::Suppression), text: "I am not used to voicing dissatisfaction or needs" },
        Item { id: 24, factor: Pattern(P::Suppression), text: "I sometimes have sudden outbursts or physical symptoms" },
        Item { id: 25, factor: Pattern(P::Avoidance), text: "The more important something is, the more I put it off" },
        Item { id: 26, factor: Pattern(P::Avoidance), text: "Under pressure I switch to other things to escape" },
        Item { id: 27, factor: Pattern(P::Avoidance), text: "I blame myself for not acting yet still cannot get moving" },
        Item { id: 28, factor: Pattern(P::Avoidance), text: "Just thinking about starting feels like a heavy load" },
        Item { id: 29, factor: Blockage(B::Action), text: "Do you know what to do but just cannot get started?" },
        Item { id: 30, factor: Blockage(B::Emotion), text: "Do your emotions often overwhelm you and make it hard to think?" },
        Item { id: 31, factor: Blockage(B::Belief), text: "Do you often feel you are not good enough or not worthy?" },
        Item { id: 32, factor: Blockage(B::Giving), text: "Have you long been giving out energy and rarely being replenished?" },
    ]
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmotionHealthResult {
    /// Layer 1 indices, 0-100.
    pub energy_index: u32,
    pub anxiety_index: u32,
    pub stress_index: u32,
    /// Layer 2 pattern sums, 0-12.
    pub exhaustion_score: u32,
    pub tension_score: u32,
    pub suppression_score: u32,
    pub avoidance_score: u32,
    pub primary_pattern: PatternType,
    pub secondary_pattern: Option<PatternType>,
    pub blocked_dimension: BlockedDimension,
    pub recommended_path: String,
}

impl EmotionHealthResult {
    pub fn index(&self, index: IndexType) -> u32 {
        match index {
            IndexType::Energy => self.energy_index,
            IndexType::Anxiety => self.anxiety_index,
            IndexType::Stress => self.stress_index,
        }
    }

    pub fn pattern_score(&self, pattern: PatternType) -> u32 {
        match pattern {
            PatternType::Exhaustion => self.exhaustion_score,
            PatternType::Tension => self.tension_score,
            PatternType::Suppression => self.suppression_score,
            PatternType::Avoidance => self.avoidance_score,
        }
    }

    pub fn index_level(&self, index: IndexType, thresholds: &EmotionHealthThresholds) -> IndexLevel {
        thresholds.index_level(self.index(index))
    }

    /// Format the result as markdown for the interpretation model's prompt.
    pub fn to_structured_input(&self, thresholds: &EmotionHealthThresholds) -> String {
        let mut output = String::from("## Emotion Health\n\n### State indices (0-100)\n");
        for def in &INDEX_FACTORS {
            let level = self.index_level(def.key, thresholds);
            output.push_str(&format!(
                "- {}: {} ({level:?})\n",
                def.name,
                self.index(def.key)
            ));
        }
        output.push_str("\n### Reaction patterns (0-12)\n");
        for def in &PATTERN_FACTORS {
            output.push_str(&format!("- {}: {}\n", def.name, self.pattern_score(def.key)));
        }
        output.push_str(&format!(
            "\n### Profile\n- Primary pattern: {}\n",
            self.primary_pattern.name()
        ));
        if let Some(secondary) = self.secondary_pattern {
            output.push_str(&format!("- Secondary pattern: {}\n", secondary.name()));
        }
        output.push_str(&format!(
            "- Blocked dimension: {} ({})\n- Recommended path: {}\n",
            self.blocked_dimension.name(),
            self.blocked_dimension.block_point(),
            self.recommended_path
        ));
        output
    }
}

impl EmotionHealth {
    /// All 32 questions, ordered by id.
    pub fn items() -> &'static [Item<EmotionFactor>] {
        &ITEMS
    }

    pub fn factor_for_question(question_id: u32) -> Option<EmotionFactor> {
        ITEMS
            .iter()
            .find(|item| item.id == question_id)
            .map(|item| item.factor)
    }

    pub fn layer_for_question(question_id: u32) -> Option<QuestionLayer> {
        Self::factor_for_question(question_id).map(EmotionFactor::layer)
    }

    /// Score a completed answer set.
    pub fn assess(
        &self,
        answers: &AnswerSet,
        policy: &ScoringPolicy,
    ) -> Result<EmotionHealthResult, InstrumentError> {
        let fill = self.prepare_answers(answers, policy.missing_answers)?;

        let indices = engine::aggregate(
            &INDEX_FACTORS,
            answers,
            fill,
            Aggregation::Percent {
                item_max: ANSWER_RANGE.max,
            },
        );
        let patterns = engine::aggregate(&PATTERN_FACTORS, answers, fill, Aggregation::Sum);
        let blockages = engine::aggregate(&BLOCKAGE_FACTORS, answers, fill, Aggregation::Sum);

        let pattern_ranking = engine::rank(&patterns, None, Gate::Open, Gate::Above(0.0));
        let blockage_ranking = engine::rank(&blockages, None, Gate::Open, Gate::Open);

        // Open gates over non-empty tables always fill the primary slot; the
        // fallbacks match what a full tie would rank first.
        let primary_pattern = pattern_ranking.primary.unwrap_or(PatternType::Exhaustion);
        let blocked_dimension = blockage_ranking.primary.unwrap_or(BlockedDimension::Action);

        let index = |key| indices.get(key).unwrap_or_default() as u32;
        let pattern = |key| patterns.get(key).unwrap_or_default() as u32;

        tracing::debug!(
            primary_pattern = ?primary_pattern,
            blocked_dimension = ?blocked_dimension,
            "scored emotion health answer set"
        );

        Ok(EmotionHealthResult {
            energy_index: index(IndexType::Energy),
            anxiety_index: index(IndexType::Anxiety),
            stress_index: index(IndexType::Stress),
            exhaustion_score: pattern(PatternType::Exhaustion),
            tension_score: pattern(PatternType::Tension),
            suppression_score: pattern(PatternType::Suppression),
            avoidance_score: pattern(PatternType::Avoidance),
            primary_pattern,
            secondary_pattern: pattern_ranking.secondary,
            blocked_dimension,
            recommended_path: blocked_dimension.recommended_path(),
        })
    }
}

impl Instrument for EmotionHealth {
    fn id(&self) -> &str {
        "emotion_health"
    }

    fn name(&self) -> &str {
        "Emotion Health"
    }

    fn answer_range(&self) -> ScoreRange {
        ANSWER_RANGE
    }

    fn domains(&self) -> &[Domain] {
        static DOMAINS: LazyLock<Vec<Domain>> = LazyLock::new(|| {
            INDEX_FACTORS
                .iter()
                .map(Domain::from)
                .chain(PATTERN_FACTORS.iter().map(Domain::from))
                .chain(BLOCKAGE_FACTORS.iter().map(Domain::from))
                .collect()
        });
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
        let result: EmotionHealthResult = serde_json::from_value(result.clone())?;
        Ok(result.to_structured_input(&policy.emotion_health))
    }
}
