use mindwell_core::error::CoreError;
use mindwell_core::models::assessment::{latest_pair, user_history};
use mindwell_core::models::{AnswerSet, AssessmentRecord};
use mindwell_core::record_keys;
use uuid::Uuid;

fn record_at(instrument_id: &str, seconds: i64) -> AssessmentRecord {
    record_for(Uuid::nil(), instrument_id, seconds)
}

fn record_for(user_id: Uuid, instrument_id: &str, seconds: i64) -> AssessmentRecord {
    let mut record = AssessmentRecord::new(
        user_id,
        instrument_id,
        AnswerSet::filled(1..=3, 1),
        serde_json::json!({ "total_score": seconds }),
    );
    record.created_at = jiff::Timestamp::from_second(seconds).unwrap();
    record
}

#[test]
fn answer_set_serializes_as_id_keyed_object() {
    let answers: AnswerSet = [(2, 3), (1, 5)].into_iter().collect();
    let json = serde_json::to_string(&answers).unwrap();
    assert_eq!(json, r#"{"1":5,"2":3}"#);

    let parsed: AnswerSet = serde_json::from_str(r#"{"10": 2, "3": 4}"#).unwrap();
    assert_eq!(parsed.get(10), Some(2));
    assert_eq!(parsed.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![3, 10]);
}

#[test]
fn answer_set_edits() {
    let mut answers = AnswerSet::filled(1..=4, 2);
    assert_eq!(answers.len(), 4);
    assert_eq!(answers.insert(2, 5), Some(2));
    assert_eq!(answers.remove(4), Some(2));
    assert!(!answers.contains(4));
    assert_eq!(answers.values().map(u32::from).sum::<u32>(), 9);
    assert!(AnswerSet::new().is_empty());
}

#[test]
fn record_round_trips_through_json() {
    let record = record_at("scl90", 1_700_000_000);
    let json = record.to_json_pretty().unwrap();
    let parsed = AssessmentRecord::from_json(&json).unwrap();

    assert_eq!(parsed.id, record.id);
    assert_eq!(parsed.created_at, record.created_at);
    assert_eq!(parsed.answers, record.answers);
}

#[test]
fn result_as_checks_instrument() {
    #[derive(Debug, serde::Deserialize)]
    struct Partial {
        total_score: i64,
    }

    let record = record_at("scl90", 42);
    let partial: Partial = record.result_as("scl90").unwrap();
    assert_eq!(partial.total_score, 42);

    let err = record.result_as::<Partial>("emotion_health").unwrap_err();
    assert!(matches!(err, CoreError::InstrumentMismatch { .. }));
}

#[test]
fn latest_pair_picks_two_newest_of_instrument() {
    let records = vec![
        record_at("scl90", 100),
        record_at("scl90", 300),
        record_at("emotion_health", 400),
        record_at("scl90", 200),
    ];

    let (current, previous) = latest_pair(&records, Uuid::nil(), "scl90").unwrap();
    assert_eq!(current.created_at.as_second(), 300);
    assert_eq!(previous.created_at.as_second(), 200);

    assert!(latest_pair(&records, Uuid::nil(), "emotion_health").is_none());
}

#[test]
fn history_is_scoped_to_one_user() {
    let alice = Uuid::from_u128(1);
    let bob = Uuid::from_u128(2);
    let records = vec![
        record_for(alice, "scl90", 100),
        record_for(bob, "scl90", 300),
        record_for(alice, "scl90", 200),
    ];

    let (current, previous) = latest_pair(&records, alice, "scl90").unwrap();
    assert_eq!(current.created_at.as_second(), 200);
    assert_eq!(previous.created_at.as_second(), 100);
    assert!(latest_pair(&records, bob, "scl90").is_none());

    let seconds: Vec<i64> = user_history(&records, alice, "scl90")
        .iter()
        .map(|r| r.created_at.as_second())
        .collect();
    assert_eq!(seconds, vec![100, 200]);
}

#[test]
fn record_keys_nest_by_user() {
    let user = Uuid::nil();
    let id = Uuid::nil();
    assert_eq!(
        record_keys::assessment(user, id),
        format!("assessments/{user}/{id}.json")
    );
    assert!(record_keys::user_assessments_prefix(user).starts_with(record_keys::ASSESSMENTS_PREFIX));
}
