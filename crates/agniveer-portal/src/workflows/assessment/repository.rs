use super::domain::{RosterEntry, ScheduledTest, TestId, TestResult};
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for the training calendar and its results.
pub trait AssessmentRepository: Send + Sync {
    fn insert_test(&self, test: ScheduledTest) -> Result<ScheduledTest, RepositoryError>;
    fn tests(&self) -> Result<Vec<ScheduledTest>, RepositoryError>;
    fn test(&self, id: TestId) -> Result<Option<ScheduledTest>, RepositoryError>;
    /// Targeted recruits joined with their results; recruits without a saved
    /// result appear as pending rows.
    fn roster(&self, id: TestId) -> Result<Vec<RosterEntry>, RepositoryError>;
    /// Store a result keyed by test and recruit. The last write wins and the
    /// test's `results_count` follows the number of stored results.
    fn upsert_result(&self, id: TestId, result: TestResult) -> Result<TestResult, RepositoryError>;
}
