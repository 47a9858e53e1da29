//! Training assessment lifecycle: test scheduling, result entry, result
//! labels, and dashboard counters.

pub mod domain;
pub mod lifecycle;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ResultLabel, RosterEntry, ScheduledTest, TargetType, TestId, TestResult, TestStatus, TestType,
};
pub use lifecycle::{
    accepts_result_entry, aggregate_stats, derive_result_label, record_result, summarize_results,
    ResultEntry, ResultSummary, TrainingStats,
};
pub use repository::AssessmentRepository;
pub use router::assessment_router;
pub use schedule::{ScheduleError, TestDraft};
pub use service::{AssessmentService, AssessmentServiceError, LabeledResult, RosterView};
