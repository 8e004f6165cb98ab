use std::path::PathBuf;

use mindwell_cli::commands::{self, OutputFormat, SaveTarget};
use mindwell_core::models::{AnswerSet, AssessmentRecord};
use mindwell_instruments::instruments::scl90::SeverityLevel;
use mindwell_instruments::policy::{MissingAnswerPolicy, ScoringPolicy};
use uuid::Uuid;

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mindwell-cli-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn scl90_record(value: u8, seconds: i64) -> AssessmentRecord {
    scl90_record_for(Uuid::nil(), value, seconds)
}

fn scl90_record_for(user_id: Uuid, value: u8, seconds: i64) -> AssessmentRecord {
    let answers = AnswerSet::filled(1..=90, value);
    let result = mindwell_instruments::get_instrument("scl90")
        .unwrap()
        .score(&answers, &ScoringPolicy::default())
        .unwrap();
    let mut record = AssessmentRecord::new(user_id, "scl90", answers, result);
    record.created_at = jiff::Timestamp::from_second(seconds).unwrap();
    record
}

#[test]
fn lists_instruments() {
    let listing = commands::list_instruments();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("scl90\tSCL-90\t90 questions\tanswers 1-5"));
    assert!(lines[1].starts_with("emotion_health\tEmotion Health\t32 questions\tanswers 0-3"));
}

#[test]
fn lists_questions_by_domain() {
    let listing = commands::list_questions("emotion_health").unwrap();
    assert!(listing.starts_with("# Emotion Health"));
    assert!(listing.contains(" 29. "));

    let err = commands::list_questions("phq9").unwrap_err();
    assert!(err.to_string().contains("unknown instrument 'phq9'"));
}

#[test]
fn reads_answer_files() {
    let dir = scratch_dir();
    let path = dir.join("answers.json");
    std::fs::write(&path, r#"{"1": 2, "2": 3}"#).unwrap();

    let answers = commands::read_answers(&path).unwrap();
    assert_eq!(answers.get(2), Some(3));

    std::fs::write(&path, "[1, 2]").unwrap();
    assert!(commands::read_answers(&path).is_err());

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn strict_flag_overrides_configured_policy() {
    let configured = ScoringPolicy::default();
    let policy = commands::effective_policy(configured, true);
    assert_eq!(policy.missing_answers, MissingAnswerPolicy::Reject);
    assert_eq!(policy.scl90, configured.scl90);

    assert_eq!(commands::effective_policy(configured, false), configured);
}

#[test]
fn scores_as_json_and_text() {
    let answers = AnswerSet::filled(1..=90, 3);
    let json = commands::score(
        "scl90",
        answers.clone(),
        &ScoringPolicy::default(),
        OutputFormat::Json,
        None,
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["total_score"], 270);
    assert_eq!(value["severity_level"], "severe");

    let text = commands::score(
        "scl90",
        answers,
        &ScoringPolicy::default(),
        OutputFormat::Text,
        None,
    )
    .unwrap();
    assert!(text.starts_with("## SCL-90"));
}

#[test]
fn strict_scoring_surfaces_missing_answers() {
    let err = commands::score(
        "emotion_health",
        AnswerSet::filled(1..=31, 1),
        &ScoringPolicy::strict(),
        OutputFormat::Json,
        None,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unanswered questions"));
}

#[test]
fn saved_records_can_be_compared() {
    let dir = scratch_dir();
    let user_id = Uuid::new_v4();

    let older = scl90_record(2, 1_000);
    let newer = scl90_record(1, 2_000);
    let older_path = commands::save_record(&dir, &older).unwrap();
    commands::save_record(&dir, &newer).unwrap();
    assert!(older_path.ends_with(format!("{}.json", older.id)));

    // A freshly scored record for another user lands beside them.
    let target = SaveTarget {
        dir: dir.clone(),
        user_id,
    };
    commands::score(
        "emotion_health",
        AnswerSet::filled(1..=32, 1),
        &ScoringPolicy::default(),
        OutputFormat::Json,
        Some(&target),
    )
    .unwrap();

    let records = commands::load_records(&[dir.clone()], None).unwrap();
    assert_eq!(records.len(), 3);

    let comparison = commands::compare(&records, None).unwrap();
    assert_eq!(comparison.gsi_change, -1.0);
    assert_eq!(comparison.improved().len(), 9);

    let text = commands::render_comparison(&comparison, OutputFormat::Text).unwrap();
    assert!(text.contains("- GSI change: -1.00 (improved)"));
    assert!(text.contains("- Somatization: 2.00 -> 1.00 (-1.00, -50.0%)"));
    assert!(text.contains("### Worsened\n- None"));

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn compare_needs_two_scl90_records() {
    let err = commands::compare(&[scl90_record(1, 10)], None).unwrap_err();
    assert!(err.to_string().contains("at least two SCL-90 records"));
}

#[test]
fn compare_stays_within_one_user() {
    let dir = scratch_dir();
    let alice = Uuid::from_u128(1);
    let bob = Uuid::from_u128(2);
    for record in [
        scl90_record_for(alice, 3, 100),
        scl90_record_for(alice, 1, 200),
        scl90_record_for(bob, 5, 300),
    ] {
        commands::save_record(&dir, &record).unwrap();
    }

    let records = commands::load_records(&[dir.clone()], None).unwrap();
    assert_eq!(records.len(), 3);
    let err = commands::compare(&records, None).unwrap_err();
    assert!(err.to_string().contains("more than one user"));

    let comparison = commands::compare(&records, Some(alice)).unwrap();
    assert_eq!(comparison.gsi_change, -2.0);
    assert_eq!(comparison.previous_severity, SeverityLevel::Severe);
    assert_eq!(comparison.current_severity, SeverityLevel::Normal);

    let scoped = commands::load_records(&[dir.clone()], Some(alice)).unwrap();
    assert_eq!(scoped.len(), 2);
    assert!(scoped.iter().all(|r| r.user_id == alice));
    assert_eq!(commands::compare(&scoped, None).unwrap().gsi_change, -2.0);

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn trend_renders_band_and_series() {
    let records = vec![scl90_record(1, 200), scl90_record(2, 100)];

    let trend = commands::trend(&records, None).unwrap();
    let text = commands::render_trend(&trend, OutputFormat::Text).unwrap();
    assert!(text.contains("- Sittings: 2"));
    assert!(text.contains("- GSI: 2.00 -> 1.00 (-1.00)"));
    assert!(text.contains("- Trend: Clearly improved"));
    assert!(text.contains("- 1970-01-01T00:01:40Z: GSI 2.00, positive items 90"));

    let json = commands::render_trend(&trend, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["band"], "clearly_improved");

    let err = commands::trend(&records[..1], None).unwrap_err();
    assert!(err.to_string().contains("at least two SCL-90 records"));
}

#[test]
fn text_output_matches_the_json_result() {
    let mut answers = AnswerSet::filled(1..=90, 1);
    answers.remove(90);
    let policy = ScoringPolicy::default();

    let json = commands::score("scl90", answers.clone(), &policy, OutputFormat::Json, None).unwrap();
    let text = commands::score("scl90", answers, &policy, OutputFormat::Text, None).unwrap();

    let result: serde_json::Value = serde_json::from_str(&json).unwrap();
    let scl90 = mindwell_instruments::get_instrument("scl90").unwrap();
    assert_eq!(text, scl90.describe_result(&result, &policy).unwrap());
}
