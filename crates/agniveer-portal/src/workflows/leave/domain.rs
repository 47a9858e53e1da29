use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::accounting::leave_duration;
use crate::workflows::validation::ValidationError;
use crate::workflows::RecruitId;

/// Identifier wrapper for persisted leave requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaveId(pub u64);

impl fmt::Display for LeaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Approval state of a leave request. Only an external approver moves a
/// request out of `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "PENDING",
            LeaveStatus::Approved => "APPROVED",
            LeaveStatus::Rejected => "REJECTED",
        }
    }

    /// Pending and approved requests both hold days against the entitlement.
    pub const fn consumes_entitlement(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(LeaveStatus::Pending),
            "APPROVED" => Some(LeaveStatus::Approved),
            "REJECTED" => Some(LeaveStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveType {
    Casual,
    Medical,
    Special,
}

impl LeaveType {
    pub const fn label(self) -> &'static str {
        match self {
            LeaveType::Casual => "CASUAL",
            LeaveType::Medical => "MEDICAL",
            LeaveType::Special => "SPECIAL",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CASUAL" => Some(LeaveType::Casual),
            "MEDICAL" => Some(LeaveType::Medical),
            "SPECIAL" => Some(LeaveType::Special),
            _ => None,
        }
    }
}

/// A persisted leave request owned by a recruit. Records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: LeaveId,
    pub recruit_id: RecruitId,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: LeaveStatus,
}

impl LeaveRequest {
    /// Inclusive calendar days covered by the request.
    pub fn days(&self) -> u32 {
        leave_duration(self.start_date, self.end_date)
    }
}

/// Calendar span of a leave application with `start <= end` guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaveSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl LeaveSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::MalformedSpan { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> u32 {
        leave_duration(self.start, self.end)
    }
}

/// Inbound application as entered by a recruit, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

impl LeaveApplication {
    pub fn span(&self) -> Result<LeaveSpan, ValidationError> {
        LeaveSpan::new(self.start_date, self.end_date)
    }

    /// Build the pending record persisted once validation passes.
    pub fn into_request(self, id: LeaveId, recruit_id: RecruitId) -> LeaveRequest {
        LeaveRequest {
            id,
            recruit_id,
            leave_type: self.leave_type,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason.filter(|reason| !reason.trim().is_empty()),
            status: LeaveStatus::Pending,
        }
    }
}
