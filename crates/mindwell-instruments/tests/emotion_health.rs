use std::collections::BTreeSet;

use mindwell_core::models::AnswerSet;
use mindwell_instruments::error::InstrumentError;
use mindwell_instruments::instruments::emotion_health::{
    BlockedDimension, EmotionHealth, IndexLevel, IndexType, PatternType, QuestionLayer,
    BLOCKAGE_FACTORS, INDEX_FACTORS, PATTERN_FACTORS,
};
use mindwell_instruments::policy::{EmotionHealthThresholds, ScoringPolicy};

fn uniform(value: u8) -> AnswerSet {
    AnswerSet::filled(1..=32, value)
}

#[test]
fn layer_tables_partition_the_bank() {
    let ids = INDEX_FACTORS
        .iter()
        .flat_map(|d| d.question_ids)
        .chain(PATTERN_FACTORS.iter().flat_map(|d| d.question_ids))
        .chain(BLOCKAGE_FACTORS.iter().flat_map(|d| d.question_ids));

    let mut seen = BTreeSet::new();
    for id in ids {
        assert!(seen.insert(*id), "question {id} belongs to two factors");
    }
    assert_eq!(seen, (1..=32).collect::<BTreeSet<u32>>());
}

#[test]
fn questions_map_to_layers() {
    assert_eq!(EmotionHealth::items().len(), 32);
    assert_eq!(EmotionHealth::layer_for_question(1), Some(QuestionLayer::Screening));
    assert_eq!(EmotionHealth::layer_for_question(12), Some(QuestionLayer::Screening));
    assert_eq!(EmotionHealth::layer_for_question(13), Some(QuestionLayer::Pattern));
    assert_eq!(EmotionHealth::layer_for_question(28), Some(QuestionLayer::Pattern));
    assert_eq!(EmotionHealth::layer_for_question(29), Some(QuestionLayer::Blockage));
    assert_eq!(EmotionHealth::layer_for_question(32), Some(QuestionLayer::Blockage));
    assert_eq!(EmotionHealth::layer_for_question(33), None);
}

#[test]
fn all_zero_answers() {
    let result = EmotionHealth
        .assess(&uniform(0), &ScoringPolicy::default())
        .unwrap();

    assert_eq!(result.energy_index, 0);
    assert_eq!(result.anxiety_index, 0);
    assert_eq!(result.stress_index, 0);
    assert_eq!(result.exhaustion_score, 0);
    assert_eq!(result.primary_pattern, PatternType::Exhaustion);
    assert_eq!(result.secondary_pattern, None);
    assert_eq!(result.blocked_dimension, BlockedDimension::Action);
    assert_eq!(
        result.recommended_path,
        "Action Coach AI + Execution Training Camp"
    );
}

#[test]
fn all_max_answers() {
    let result = EmotionHealth
        .assess(&uniform(3), &ScoringPolicy::default())
        .unwrap();

    assert_eq!(result.energy_index, 100);
    assert_eq!(result.anxiety_index, 100);
    assert_eq!(result.stress_index, 100);
    assert_eq!(result.avoidance_score, 12);
    assert_eq!(result.primary_pattern, PatternType::Exhaustion);
    assert_eq!(result.secondary_pattern, Some(PatternType::Tension));
}

#[test]
fn indices_are_rounded_percentages() {
    let mut answers = uniform(0);
    for (id, value) in [(1, 1), (5, 2), (6, 2), (7, 1), (9, 3), (10, 3), (11, 3), (12, 2)] {
        answers.insert(id, value);
    }

    let result = EmotionHealth
        .assess(&answers, &ScoringPolicy::default())
        .unwrap();
    assert_eq!(result.energy_index, 8); // 1 / 12
    assert_eq!(result.anxiety_index, 42); // 5 / 12
    assert_eq!(result.stress_index, 92); // 11 / 12
}

#[test]
fn patterns_rank_by_sum() {
    let mut answers = uniform(0);
    for id in 17..=20 {
        answers.insert(id, 3);
    }
    for id in 25..=28 {
        answers.insert(id, 1);
    }

    let result = EmotionHealth
        .assess(&answers, &ScoringPolicy::default())
        .unwrap();
    assert_eq!(result.tension_score, 12);
    assert_eq!(result.avoidance_score, 4);
    assert_eq!(result.primary_pattern, PatternType::Tension);
    assert_eq!(result.secondary_pattern, Some(PatternType::Avoidance));
}

#[test]
fn pattern_ties_keep_declared_order() {
    let mut answers = uniform(0);
    for id in [21, 25] {
        answers.insert(id, 2);
    }

    let result = EmotionHealth
        .assess(&answers, &ScoringPolicy::default())
        .unwrap();
    assert_eq!(result.primary_pattern, PatternType::Suppression);
    assert_eq!(result.secondary_pattern, Some(PatternType::Avoidance));
}

#[test]
fn blocked_dimension_is_the_strongest_vote() {
    let mut answers = uniform(0);
    answers.insert(29, 1);
    answers.insert(30, 3);
    answers.insert(31, 3);

    let result = EmotionHealth
        .assess(&answers, &ScoringPolicy::default())
        .unwrap();
    assert_eq!(result.blocked_dimension, BlockedDimension::Emotion);
    assert_eq!(
        result.recommended_path,
        "Emotion Coach AI + Emotion Journal Camp"
    );
}

#[test]
fn missing_answers_count_as_zero() {
    let mut answers = AnswerSet::new();
    answers.insert(32, 2);

    let result = EmotionHealth
        .assess(&answers, &ScoringPolicy::default())
        .unwrap();
    assert_eq!(result.energy_index, 0);
    assert_eq!(result.blocked_dimension, BlockedDimension::Giving);
}

#[test]
fn strict_policy_rejects_incomplete_answers() {
    let mut answers = uniform(1);
    answers.remove(30);

    let err = EmotionHealth
        .assess(&answers, &ScoringPolicy::strict())
        .unwrap_err();
    assert!(matches!(
        err,
        InstrumentError::MissingAnswers { ref question_ids, .. } if question_ids == &vec![30]
    ));
}

#[test]
fn strict_policy_rejects_values_above_three() {
    let mut answers = uniform(1);
    answers.insert(4, 4);

    let err = EmotionHealth
        .assess(&answers, &ScoringPolicy::strict())
        .unwrap_err();
    assert!(matches!(err, InstrumentError::Validation(ref e) if e.question_id == 4));
}

#[test]
fn index_levels_use_thresholds() {
    let thresholds = EmotionHealthThresholds::default();
    assert_eq!(thresholds.index_level(0), IndexLevel::Low);
    assert_eq!(thresholds.index_level(39), IndexLevel::Low);
    assert_eq!(thresholds.index_level(40), IndexLevel::Medium);
    assert_eq!(thresholds.index_level(69), IndexLevel::Medium);
    assert_eq!(thresholds.index_level(70), IndexLevel::High);

    let result = EmotionHealth
        .assess(&uniform(3), &ScoringPolicy::default())
        .unwrap();
    assert_eq!(result.index_level(IndexType::Stress, &thresholds), IndexLevel::High);
}

#[test]
fn structured_input_lists_profile() {
    let result = EmotionHealth
        .assess(&uniform(2), &ScoringPolicy::default())
        .unwrap();
    let text = result.to_structured_input(&EmotionHealthThresholds::default());

    assert!(text.starts_with("## Emotion Health"));
    assert!(text.contains("- Emotional Energy: 67 (Medium)"));
    assert!(text.contains("- High Tension: 8"));
    assert!(text.contains("- Primary pattern: Energy Exhaustion"));
    assert!(text.contains("- Secondary pattern: High Tension"));
    assert!(text.contains("- Recommended path: Action Coach AI + Execution Training Camp"));
}
