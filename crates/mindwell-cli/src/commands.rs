//! Command implementations behind the `mindwell` binary.
//!
//! Each command returns the text to print so the binary stays a thin
//! dispatcher and the behavior can be tested without a process.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use mindwell_core::models::assessment::latest_pair;
use mindwell_core::models::{AnswerSet, AssessmentRecord};
use mindwell_core::record_keys;
use mindwell_instruments::error::InstrumentError;
use mindwell_instruments::history::{FactorChange, Scl90Comparison, Scl90Trend, Trend};
use mindwell_instruments::instruments::scl90::{self, Scl90Result};
use mindwell_instruments::policy::{MissingAnswerPolicy, ScoringPolicy};
use mindwell_instruments::{Instrument, all_instruments, get_instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// The result object as pretty-printed JSON
    #[default]
    Json,
    /// The markdown summary handed to the interpretation model
    Text,
}

/// Where and for whom to persist a scored assessment.
#[derive(Debug, Clone)]
pub struct SaveTarget {
    pub dir: PathBuf,
    pub user_id: Uuid,
}

fn instrument(id: &str) -> Result<Box<dyn Instrument>, InstrumentError> {
    get_instrument(id).ok_or_else(|| InstrumentError::UnknownInstrument(id.to_string()))
}

/// One line per registered instrument: id, name, question count, answer range.
pub fn list_instruments() -> String {
    let mut out = String::new();
    for instrument in all_instruments() {
        let range = instrument.answer_range();
        let _ = writeln!(
            out,
            "{}\t{}\t{} questions\tanswers {}-{}",
            instrument.id(),
            instrument.name(),
            instrument.questions().len(),
            range.min,
            range.max,
        );
    }
    out
}

/// The question bank of one instrument, grouped under its domains.
pub fn list_questions(instrument_id: &str) -> eyre::Result<String> {
    let instrument = instrument(instrument_id)?;
    let mut out = String::new();
    let _ = writeln!(out, "# {}", instrument.name());
    for domain in instrument.domains() {
        let _ = writeln!(out, "\n## {} ({})", domain.name, domain.id);
        for question in instrument
            .questions()
            .iter()
            .filter(|q| q.domain_id == domain.id)
        {
            let _ = writeln!(out, "{:>3}. {}", question.id, question.text);
        }
    }
    Ok(out)
}

/// Read an answer file: a JSON object mapping question id to answer value.
pub fn read_answers(path: &Path) -> eyre::Result<AnswerSet> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read answers at {}: {e}", path.display()))?;
    let answers: AnswerSet = serde_json::from_str(&contents)
        .map_err(|e| eyre::eyre!("invalid answer file {}: {e}", path.display()))?;
    Ok(answers)
}

/// The configured policy, with `strict` forcing incomplete sets to be rejected.
pub fn effective_policy(configured: ScoringPolicy, strict: bool) -> ScoringPolicy {
    if strict {
        ScoringPolicy {
            missing_answers: MissingAnswerPolicy::Reject,
            ..configured
        }
    } else {
        configured
    }
}

/// Score `answers` and render them in `format`, optionally persisting a record.
pub fn score(
    instrument_id: &str,
    answers: AnswerSet,
    policy: &ScoringPolicy,
    format: OutputFormat,
    save: Option<&SaveTarget>,
) -> eyre::Result<String> {
    let instrument = instrument(instrument_id)?;
    let result = instrument.score(&answers, policy)?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => instrument.describe_result(&result, policy)?,
    };

    if let Some(target) = save {
        let record = AssessmentRecord::new(target.user_id, instrument.id(), answers, result);
        save_record(&target.dir, &record)?;
    }

    Ok(rendered)
}

/// Write `record` under `dir` at its record key, returning the file path.
pub fn save_record(dir: &Path, record: &AssessmentRecord) -> eyre::Result<PathBuf> {
    let path = dir.join(record_keys::assessment(record.user_id, record.id));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, record.to_json_pretty()?)?;

    tracing::info!(
        path = %path.display(),
        instrument = %record.instrument_id,
        record_id = %record.id,
        "assessment saved"
    );
    Ok(path)
}

/// Load records from files, descending into directories for `*.json` files.
///
/// With `user_id`, a directory holding that user's record folder is narrowed
/// to it.
pub fn load_records(
    paths: &[PathBuf],
    user_id: Option<Uuid>,
) -> eyre::Result<Vec<AssessmentRecord>> {
    let mut records = Vec::new();
    for path in paths {
        let scoped = user_id
            .map(|user_id| path.join(record_keys::user_assessments_prefix(user_id)))
            .filter(|scoped| scoped.is_dir());
        collect_records(scoped.as_deref().unwrap_or(path.as_path()), &mut records)?;
    }
    tracing::debug!(count = records.len(), "loaded assessment records");
    Ok(records)
}

fn collect_records(path: &Path, records: &mut Vec<AssessmentRecord>) -> eyre::Result<()> {
    if path.is_dir() {
        let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        entries.sort();
        for entry in entries {
            if entry.is_dir() || entry.extension().is_some_and(|ext| ext == "json") {
                collect_records(&entry, records)?;
            }
        }
        return Ok(());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read record at {}: {e}", path.display()))?;
    let record = AssessmentRecord::from_json(&contents)
        .map_err(|e| eyre::eyre!("invalid record {}: {e}", path.display()))?;
    records.push(record);
    Ok(())
}

/// The user whose SCL-90 history to read: `requested`, or the only user
/// the records belong to.
fn history_user(records: &[AssessmentRecord], requested: Option<Uuid>) -> eyre::Result<Uuid> {
    if let Some(user_id) = requested {
        return Ok(user_id);
    }
    let users: BTreeSet<Uuid> = records
        .iter()
        .filter(|r| r.instrument_id == scl90::ID)
        .map(|r| r.user_id)
        .collect();
    let mut users = users.into_iter();
    match (users.next(), users.next()) {
        (Some(user_id), None) => Ok(user_id),
        (None, _) => Err(eyre::eyre!("no SCL-90 records found")),
        (Some(_), Some(_)) => Err(eyre::eyre!(
            "SCL-90 records belong to more than one user, pass --user to choose one"
        )),
    }
}

/// Compare one user's two most recent SCL-90 records.
pub fn compare(
    records: &[AssessmentRecord],
    user_id: Option<Uuid>,
) -> eyre::Result<Scl90Comparison> {
    let user_id = history_user(records, user_id)?;
    let (current, previous) = latest_pair(records, user_id, scl90::ID)
        .ok_or_else(|| eyre::eyre!("need at least two SCL-90 records to compare"))?;
    let current: Scl90Result = current.result_as(scl90::ID)?;
    let previous: Scl90Result = previous.result_as(scl90::ID)?;
    Ok(Scl90Comparison::between(&current, &previous))
}

/// One user's SCL-90 trend from the first to the latest sitting.
pub fn trend(records: &[AssessmentRecord], user_id: Option<Uuid>) -> eyre::Result<Scl90Trend> {
    let user_id = history_user(records, user_id)?;
    Scl90Trend::over(records, user_id)?
        .ok_or_else(|| eyre::eyre!("need at least two SCL-90 records to show a trend"))
}

pub fn render_trend(trend: &Scl90Trend, format: OutputFormat) -> eyre::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(trend)?);
    }

    let mut out = String::new();
    let _ = writeln!(out, "## SCL-90 trend");
    let _ = writeln!(out, "- Sittings: {}", trend.series.len());
    let _ = writeln!(
        out,
        "- GSI: {:.2} -> {:.2} ({:+.2})",
        trend.first_gsi, trend.latest_gsi, trend.gsi_change
    );
    let _ = writeln!(out, "- Trend: {}", trend.band.label());
    let _ = writeln!(out, "- {}", trend.band.description(trend.gsi_change));

    let _ = writeln!(out, "\n### Series");
    for point in &trend.series {
        let _ = writeln!(
            out,
            "- {}: GSI {:.2}, positive items {}",
            point.taken_at, point.gsi, point.positive_count
        );
    }
    Ok(out)
}

pub fn render_comparison(
    comparison: &Scl90Comparison,
    format: OutputFormat,
) -> eyre::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(comparison)?);
    }

    let mut out = String::new();
    let _ = writeln!(out, "## SCL-90 comparison");
    let _ = writeln!(
        out,
        "- GSI change: {:+.2} ({})",
        comparison.gsi_change,
        trend_label(comparison.gsi_trend)
    );
    let _ = writeln!(
        out,
        "- Positive items change: {:+}",
        comparison.positive_count_change
    );
    let _ = writeln!(
        out,
        "- Severity: {} -> {}",
        comparison.previous_severity.label(),
        comparison.current_severity.label()
    );

    for (heading, changes) in [
        ("Improved", comparison.improved()),
        ("Worsened", comparison.worsened()),
    ] {
        let _ = writeln!(out, "\n### {heading}");
        if changes.is_empty() {
            let _ = writeln!(out, "- None");
        }
        for change in changes {
            let _ = writeln!(out, "{}", change_line(change));
        }
    }
    Ok(out)
}

fn change_line(change: &FactorChange) -> String {
    format!(
        "- {}: {:.2} -> {:.2} ({:+.2}, {:+.1}%)",
        change.factor.name(),
        change.previous,
        change.current,
        change.change,
        change.change_percent
    )
}

fn trend_label(trend: Trend) -> &'static str {
    match trend {
        Trend::Improved => "improved",
        Trend::Stable => "stable",
        Trend::Worsened => "worsened",
    }
}
