//! CSV exports of leave history and the training calendar, read into the
//! records the rule engines consume.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::assessment::{
    ScheduleError, ScheduledTest, TargetType, TestDraft, TestId, TestStatus, TestType,
};
use crate::workflows::leave::{LeaveId, LeaveRequest, LeaveStatus, LeaveType};
use crate::workflows::RecruitId;

use parser::{LeaveRow, ScheduleRow};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidDate {
        line: u64,
        value: String,
    },
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
    },
    ReversedSpan {
        line: u64,
    },
    InvalidTest {
        line: u64,
        source: ScheduleError,
    },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            ImportError::InvalidDate { line, value } => {
                write!(f, "line {}: unrecognised date '{}'", line, value)
            }
            ImportError::InvalidField {
                line,
                column,
                value,
            } => write!(f, "line {}: unrecognised {} '{}'", line, column, value),
            ImportError::ReversedSpan { line } => {
                write!(f, "line {}: leave ends before it starts", line)
            }
            ImportError::InvalidTest { line, source } => {
                write!(f, "line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::InvalidTest { source, .. } => Some(source),
            ImportError::InvalidDate { .. }
            | ImportError::InvalidField { .. }
            | ImportError::ReversedSpan { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads `id,leave_type,start_date,end_date,reason,status` rows for one recruit.
pub struct LeaveHistoryImporter;

impl LeaveHistoryImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        recruit_id: RecruitId,
    ) -> Result<Vec<LeaveRequest>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, recruit_id)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        recruit_id: RecruitId,
    ) -> Result<Vec<LeaveRequest>, ImportError> {
        parser::read_rows::<LeaveRow, _>(reader)?
            .into_iter()
            .map(|(line, row)| leave_request(line, row, recruit_id))
            .collect()
    }
}

fn leave_request(
    line: u64,
    row: LeaveRow,
    recruit_id: RecruitId,
) -> Result<LeaveRequest, ImportError> {
    let leave_type = LeaveType::parse(&row.leave_type)
        .ok_or_else(|| invalid_field(line, "leave_type", &row.leave_type))?;
    let status = LeaveStatus::parse(&row.status)
        .ok_or_else(|| invalid_field(line, "status", &row.status))?;
    let start_date = date(line, &row.start_date)?;
    let end_date = date(line, &row.end_date)?;
    if end_date < start_date {
        return Err(ImportError::ReversedSpan { line });
    }

    Ok(LeaveRequest {
        id: LeaveId(row.id),
        recruit_id,
        leave_type,
        start_date,
        end_date,
        reason: row.reason,
        status,
    })
}

/// Reads the training calendar export. Rows go through the same checks as a
/// newly scheduled test; blank marks fall back to the scheduling defaults.
pub struct TestScheduleImporter;

impl TestScheduleImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ScheduledTest>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ScheduledTest>, ImportError> {
        parser::read_rows::<ScheduleRow, _>(reader)?
            .into_iter()
            .map(|(line, row)| scheduled_test(line, row))
            .collect()
    }
}

fn scheduled_test(line: u64, row: ScheduleRow) -> Result<ScheduledTest, ImportError> {
    let test_type = TestType::parse(&row.test_type)
        .ok_or_else(|| invalid_field(line, "test_type", &row.test_type))?;
    let target_type = TargetType::parse(&row.target_type)
        .ok_or_else(|| invalid_field(line, "target_type", &row.target_type))?;
    let status = TestStatus::parse(&row.status)
        .ok_or_else(|| invalid_field(line, "status", &row.status))?;
    let scheduled_date = parser::parse_datetime(&row.scheduled_date).ok_or_else(|| {
        ImportError::InvalidDate {
            line,
            value: row.scheduled_date.clone(),
        }
    })?;

    let draft = TestDraft {
        name: row.name,
        test_type,
        description: None,
        scheduled_date,
        end_time: None,
        location: None,
        target_type,
        target_value: row.target_value,
        instructor: None,
        max_marks: row.max_marks,
        passing_marks: row.passing_marks,
    };
    let mut test = draft
        .into_test(TestId(row.id))
        .map_err(|source| ImportError::InvalidTest { line, source })?;
    test.status = status;
    test.results_count = row.results_count.unwrap_or_default();
    Ok(test)
}

fn date(line: u64, value: &str) -> Result<chrono::NaiveDate, ImportError> {
    parser::parse_date(value).ok_or_else(|| ImportError::InvalidDate {
        line,
        value: value.to_string(),
    })
}

fn invalid_field(line: u64, column: &'static str, value: &str) -> ImportError {
    ImportError::InvalidField {
        line,
        column,
        value: value.to_string(),
    }
}
