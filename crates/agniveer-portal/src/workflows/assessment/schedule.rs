use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::domain::{ScheduledTest, TargetType, TestId, TestStatus, TestType};

const DEFAULT_MAX_MARKS: f64 = 100.0;
const DEFAULT_PASSING_MARKS: f64 = 50.0;

/// Scheduling errors raised before a test reaches the calendar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("test name must not be empty")]
    EmptyName,
    #[error("max marks must be a positive number (found {0})")]
    InvalidMaxMarks(f64),
    #[error("passing marks {passing_marks} must lie within 0..={max_marks}")]
    PassingMarksOutOfRange { passing_marks: f64, max_marks: f64 },
    #[error("{0:?} assignment requires a target value")]
    MissingTargetValue(TargetType),
    #[error("test ends at {end} before it starts at {start}")]
    EndsBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Officer-entered test definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDraft {
    pub name: String,
    pub test_type: TestType,
    #[serde(default)]
    pub description: Option<String>,
    pub scheduled_date: NaiveDateTime,
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub location: Option<String>,
    pub target_type: TargetType,
    #[serde(default)]
    pub target_value: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub max_marks: Option<f64>,
    #[serde(default)]
    pub passing_marks: Option<f64>,
}

impl TestDraft {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::EmptyName);
        }

        let max_marks = self.max_marks.unwrap_or(DEFAULT_MAX_MARKS);
        if !max_marks.is_finite() || max_marks <= 0.0 {
            return Err(ScheduleError::InvalidMaxMarks(max_marks));
        }

        let passing_marks = self.passing_marks.unwrap_or(DEFAULT_PASSING_MARKS);
        if !passing_marks.is_finite() || passing_marks < 0.0 || passing_marks > max_marks {
            return Err(ScheduleError::PassingMarksOutOfRange {
                passing_marks,
                max_marks,
            });
        }

        let has_target = self
            .target_value
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty());
        if self.target_type != TargetType::All && !has_target {
            return Err(ScheduleError::MissingTargetValue(self.target_type));
        }

        if let Some(end) = self.end_time {
            if end < self.scheduled_date {
                return Err(ScheduleError::EndsBeforeStart {
                    start: self.scheduled_date,
                    end,
                });
            }
        }

        Ok(())
    }

    /// Validate and place the draft on the calendar as a scheduled test.
    pub fn into_test(self, id: TestId) -> Result<ScheduledTest, ScheduleError> {
        self.validate()?;

        let target_value = match self.target_type {
            TargetType::All => None,
            _ => self.target_value.map(|value| value.trim().to_string()),
        };

        Ok(ScheduledTest {
            id,
            name: self.name.trim().to_string(),
            test_type: self.test_type,
            description: self.description,
            scheduled_date: self.scheduled_date,
            end_time: self.end_time,
            location: self.location,
            target_type: self.target_type,
            target_value,
            instructor: self.instructor,
            max_marks: self.max_marks.unwrap_or(DEFAULT_MAX_MARKS),
            passing_marks: self.passing_marks.unwrap_or(DEFAULT_PASSING_MARKS),
            status: TestStatus::Scheduled,
            results_count: 0,
        })
    }
}
