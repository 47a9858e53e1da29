use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::{ResultLabel, ScheduledTest, TestId, TestResult, TestStatus};
use super::lifecycle::{
    accepts_result_entry, aggregate_stats, derive_result_label, record_result, summarize_results,
    ResultEntry, ResultSummary, TrainingStats,
};
use super::repository::AssessmentRepository;
use super::schedule::{ScheduleError, TestDraft};
use crate::workflows::repository::RepositoryError;
use crate::workflows::validation::ValidationError;
use crate::workflows::{RecruitId, RecruitRef};

/// Service composing the lifecycle rules with the training calendar storage.
pub struct AssessmentService<R> {
    repository: Arc<R>,
}

static TEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_test_id() -> TestId {
    TestId(TEST_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// Roster row with its derived label.
#[derive(Debug, Clone, Serialize)]
pub struct LabeledResult {
    pub recruit: RecruitRef,
    pub result: TestResult,
    pub label: ResultLabel,
    pub label_text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterView {
    pub test: ScheduledTest,
    pub entries: Vec<LabeledResult>,
    pub summary: ResultSummary,
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn schedule(&self, draft: TestDraft) -> Result<ScheduledTest, AssessmentServiceError> {
        let test = draft.into_test(next_test_id())?;
        let stored = self.repository.insert_test(test)?;
        info!(
            test_id = %stored.id,
            test_type = stored.test_type.label(),
            scheduled = %stored.scheduled_date,
            "test scheduled"
        );
        Ok(stored)
    }

    pub fn tests(&self) -> Result<Vec<ScheduledTest>, AssessmentServiceError> {
        Ok(self.repository.tests()?)
    }

    pub fn stats(&self) -> Result<TrainingStats, AssessmentServiceError> {
        let tests = self.repository.tests()?;
        Ok(aggregate_stats(&tests))
    }

    /// Tests currently open for result entry.
    pub fn entry_candidates(&self) -> Result<Vec<ScheduledTest>, AssessmentServiceError> {
        Ok(self
            .repository
            .tests()?
            .into_iter()
            .filter(accepts_result_entry)
            .collect())
    }

    pub fn roster(&self, test_id: TestId) -> Result<RosterView, AssessmentServiceError> {
        let test = self.fetch_test(test_id)?;
        let roster = self.repository.roster(test_id)?;
        let summary = summarize_results(&test, &roster);
        let entries = roster
            .into_iter()
            .map(|entry| {
                let label = derive_result_label(&entry.result, &test);
                LabeledResult {
                    recruit: entry.recruit,
                    result: entry.result,
                    label,
                    label_text: label.label(),
                }
            })
            .collect();

        Ok(RosterView {
            test,
            entries,
            summary,
        })
    }

    /// Save one recruit's result for a test and return it with its label.
    pub fn record_result(
        &self,
        test_id: TestId,
        entry: ResultEntry,
    ) -> Result<LabeledResult, AssessmentServiceError> {
        let test = self.fetch_test(test_id)?;
        if !accepts_result_entry(&test) {
            return Err(AssessmentServiceError::EntryClosed {
                test_id,
                status: test.status,
            });
        }

        let recruit = self
            .repository
            .roster(test_id)?
            .into_iter()
            .map(|row| row.recruit)
            .find(|recruit| recruit.id == entry.recruit_id)
            .ok_or(AssessmentServiceError::NotOnRoster {
                test_id,
                recruit_id: entry.recruit_id,
            })?;

        let result = record_result(&test, &entry).map_err(|rejection| {
            warn!(
                %test_id,
                recruit_id = %entry.recruit_id,
                kind = rejection.kind(),
                "result rejected"
            );
            rejection
        })?;
        let stored = self.repository.upsert_result(test_id, result)?;
        let label = derive_result_label(&stored, &test);

        info!(
            %test_id,
            recruit_id = %stored.recruit_id,
            label = label.label(),
            "result recorded"
        );

        Ok(LabeledResult {
            recruit,
            result: stored,
            label,
            label_text: label.label(),
        })
    }

    fn fetch_test(&self, test_id: TestId) -> Result<ScheduledTest, AssessmentServiceError> {
        Ok(self
            .repository
            .test(test_id)?
            .ok_or(RepositoryError::NotFound)?)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("test {test_id} is {} and not open for result entry", .status.label())]
    EntryClosed { test_id: TestId, status: TestStatus },
    #[error("recruit {recruit_id} is not on the roster for test {test_id}")]
    NotOnRoster {
        test_id: TestId,
        recruit_id: RecruitId,
    },
}
