use serde::{Deserialize, Serialize};

use super::domain::{ResultLabel, RosterEntry, ScheduledTest, TestResult, TestStatus};
use crate::workflows::validation::ValidationError;
use crate::workflows::RecruitId;

/// Classify a recruit's result against the test's passing mark.
///
/// Absence wins over any score. A saved result without a score is a fail.
pub fn derive_result_label(result: &TestResult, test: &ScheduledTest) -> ResultLabel {
    if !result.has_result {
        return ResultLabel::Pending;
    }
    if result.is_absent {
        return ResultLabel::Absent;
    }
    match result.score {
        Some(score) if score >= test.passing_marks => ResultLabel::Pass,
        _ => ResultLabel::Fail,
    }
}

/// Roster-level counters shown on the training dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrainingStats {
    pub total: usize,
    pub upcoming: usize,
    pub completed: usize,
    /// Currently the same count as `upcoming`: every scheduled test is treated
    /// as awaiting entry, and completed tests are not inspected for missing
    /// result rows.
    pub pending_entry: usize,
}

pub fn aggregate_stats(tests: &[ScheduledTest]) -> TrainingStats {
    tests.iter().fold(
        TrainingStats {
            total: tests.len(),
            ..TrainingStats::default()
        },
        |mut stats, test| {
            match test.status {
                TestStatus::Scheduled => {
                    stats.upcoming += 1;
                    stats.pending_entry += 1;
                }
                TestStatus::Completed => stats.completed += 1,
                TestStatus::InProgress | TestStatus::Cancelled => {}
            }
            stats
        },
    )
}

/// Only scheduled and completed tests are offered for result entry.
pub fn accepts_result_entry(test: &ScheduledTest) -> bool {
    matches!(test.status, TestStatus::Scheduled | TestStatus::Completed)
}

/// A save from the result-entry table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub recruit_id: RecruitId,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub is_absent: bool,
}

/// Normalize an entry into the result handed off for persistence.
///
/// Marking absent clears the score; saving a score clears a previous absence.
/// Every save sets `has_result`.
pub fn record_result(
    test: &ScheduledTest,
    entry: &ResultEntry,
) -> Result<TestResult, ValidationError> {
    let score = if entry.is_absent {
        None
    } else {
        match entry.score {
            Some(score) if !score.is_finite() || score < 0.0 || score > test.max_marks => {
                return Err(ValidationError::OutOfRangeScore {
                    score,
                    max_marks: test.max_marks,
                });
            }
            other => other,
        }
    };

    Ok(TestResult {
        recruit_id: entry.recruit_id,
        score,
        is_absent: entry.is_absent,
        has_result: true,
    })
}

/// Outcome counts across one test's roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub pass: usize,
    pub fail: usize,
    pub absent: usize,
    pub pending: usize,
}

impl ResultSummary {
    pub fn recorded(&self) -> usize {
        self.pass + self.fail + self.absent
    }
}

pub fn summarize_results(test: &ScheduledTest, roster: &[RosterEntry]) -> ResultSummary {
    roster
        .iter()
        .fold(ResultSummary::default(), |mut summary, entry| {
            match derive_result_label(&entry.result, test) {
                ResultLabel::Pass => summary.pass += 1,
                ResultLabel::Fail => summary.fail += 1,
                ResultLabel::Absent => summary.absent += 1,
                ResultLabel::Pending => summary.pending += 1,
            }
            summary
        })
}
