use mindwell_core::models::AnswerSet;
use mindwell_instruments::policy::ScoringPolicy;
use mindwell_instruments::{all_instruments, get_instrument};

#[test]
fn registry_lists_both_instruments() {
    let ids: Vec<String> = all_instruments()
        .iter()
        .map(|i| i.id().to_string())
        .collect();
    assert_eq!(ids, vec!["scl90", "emotion_health"]);
    assert!(get_instrument("unknown").is_none());
}

#[test]
fn catalog_views_cover_every_question() {
    for instrument in all_instruments() {
        let questions = instrument.questions();
        let domain_total: usize = instrument.domains().iter().map(|d| d.question_ids.len()).sum();
        assert_eq!(domain_total, questions.len(), "{}", instrument.id());

        for question in questions {
            let domain = instrument
                .domains()
                .iter()
                .find(|d| d.id == question.domain_id)
                .unwrap_or_else(|| panic!("question {} has no domain", question.id));
            assert!(domain.question_ids.contains(&question.id));
        }
    }

    let scl90 = get_instrument("scl90").unwrap();
    assert_eq!(scl90.questions().len(), 90);
    assert_eq!(scl90.domains().len(), 10);
    let emotion = get_instrument("emotion_health").unwrap();
    assert_eq!(emotion.questions().len(), 32);
    assert_eq!(emotion.domains().len(), 11);
}

#[test]
fn validate_answers_reports_every_problem() {
    let scl90 = get_instrument("scl90").unwrap();
    let answers: AnswerSet = [(1, 0), (2, 3), (3, 9), (100, 1)].into_iter().collect();

    let errors = scl90.validate_answers(&answers);
    let ids: Vec<u32> = errors.iter().map(|e| e.question_id).collect();
    assert_eq!(ids, vec![1, 3, 100]);
    assert!(errors[0].message.contains("outside range [1, 5]"));
    assert!(errors[2].message.contains("does not exist"));
}

#[test]
fn missing_questions_lists_unanswered_ids() {
    let emotion = get_instrument("emotion_health").unwrap();
    let answers = AnswerSet::filled(1..=30, 1);
    assert_eq!(emotion.missing_questions(&answers), vec![31, 32]);
}

#[test]
fn score_returns_result_json() {
    let scl90 = get_instrument("scl90").unwrap();
    let json = scl90
        .score(&AnswerSet::filled(1..=90, 1), &ScoringPolicy::default())
        .unwrap();
    assert_eq!(json["total_score"], 90);
    assert_eq!(json["severity_level"], "normal");

    let emotion = get_instrument("emotion_health").unwrap();
    let json = emotion
        .score(&AnswerSet::filled(1..=32, 3), &ScoringPolicy::default())
        .unwrap();
    assert_eq!(json["energy_index"], 100);
    assert_eq!(json["primary_pattern"], "exhaustion");
}

#[test]
fn structured_input_goes_through_the_trait() {
    let scl90 = get_instrument("scl90").unwrap();
    let text = scl90
        .to_structured_input(&AnswerSet::filled(1..=90, 1), &ScoringPolicy::default())
        .unwrap();
    assert!(text.contains("- Total score: 90/450"));
    assert!(text.contains("- No standout factor"));
}

#[test]
fn strict_scoring_fails_through_the_trait() {
    let emotion = get_instrument("emotion_health").unwrap();
    let err = emotion
        .score(&AnswerSet::new(), &ScoringPolicy::strict())
        .unwrap_err();
    assert!(err.to_string().contains("unanswered questions"));
}

#[test]
fn describe_result_renders_a_scored_result() {
    let emotion = get_instrument("emotion_health").unwrap();
    let policy = ScoringPolicy::default();
    let answers = AnswerSet::filled(1..=32, 2);

    let result = emotion.score(&answers, &policy).unwrap();
    let described = emotion.describe_result(&result, &policy).unwrap();
    assert_eq!(described, emotion.to_structured_input(&answers, &policy).unwrap());
    assert!(described.starts_with("## Emotion Health"));

    let scl90 = get_instrument("scl90").unwrap();
    assert!(scl90.describe_result(&result, &policy).is_err());
}
