use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::{RecruitId, RecruitRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(pub u64);

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestType {
    Pft,
    Firing,
    Weapons,
    Tactical,
    Cognitive,
    Classroom,
    Custom,
}

impl TestType {
    pub const fn label(self) -> &'static str {
        match self {
            TestType::Pft => "Physical Fitness Test",
            TestType::Firing => "Firing Range",
            TestType::Weapons => "Weapon Handling",
            TestType::Tactical => "Tactical Drills",
            TestType::Cognitive => "Written/Mental Test",
            TestType::Classroom => "Theory Session",
            TestType::Custom => "Custom",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PFT" => Some(TestType::Pft),
            "FIRING" => Some(TestType::Firing),
            "WEAPONS" => Some(TestType::Weapons),
            "TACTICAL" => Some(TestType::Tactical),
            "COGNITIVE" => Some(TestType::Cognitive),
            "CLASSROOM" => Some(TestType::Classroom),
            "CUSTOM" => Some(TestType::Custom),
            _ => None,
        }
    }
}

/// Lifecycle state stored on a scheduled test. The engine aggregates it but
/// never infers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl TestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            TestStatus::Scheduled => "SCHEDULED",
            TestStatus::InProgress => "IN_PROGRESS",
            TestStatus::Completed => "COMPLETED",
            TestStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SCHEDULED" => Some(TestStatus::Scheduled),
            "IN_PROGRESS" => Some(TestStatus::InProgress),
            "COMPLETED" => Some(TestStatus::Completed),
            "CANCELLED" => Some(TestStatus::Cancelled),
            _ => None,
        }
    }
}

/// Who a test is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    Batch,
    Company,
    All,
}

impl TargetType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BATCH" => Some(TargetType::Batch),
            "COMPANY" => Some(TargetType::Company),
            "ALL" => Some(TargetType::All),
            _ => None,
        }
    }
}

/// A training test on the unit calendar. `max_marks > 0` and
/// `0 <= passing_marks <= max_marks` hold for every value built through
/// [`super::TestDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTest {
    pub id: TestId,
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
    pub max_marks: f64,
    pub passing_marks: f64,
    pub status: TestStatus,
    #[serde(default)]
    pub results_count: u32,
}

impl ScheduledTest {
    /// Whether `recruit` is on this test's roster.
    pub fn targets(&self, recruit: &RecruitRef) -> bool {
        let wanted = self.target_value.as_deref().map(str::trim);
        match self.target_type {
            TargetType::All => true,
            TargetType::Batch => matches_value(wanted, recruit.batch_no.as_deref()),
            TargetType::Company => matches_value(wanted, recruit.company.as_deref()),
        }
    }
}

fn matches_value(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match (wanted, actual) {
        (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual.trim()),
        _ => false,
    }
}

/// One recruit's outcome for one test. `is_absent` implies `score` is `None`;
/// `has_result` turns true on the first save and stays true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub recruit_id: RecruitId,
    pub score: Option<f64>,
    pub is_absent: bool,
    pub has_result: bool,
}

impl TestResult {
    /// Placeholder row for a targeted recruit with nothing saved yet.
    pub fn pending(recruit_id: RecruitId) -> Self {
        Self {
            recruit_id,
            score: None,
            is_absent: false,
            has_result: false,
        }
    }
}

/// Roster row: a targeted recruit joined with their result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub recruit: RecruitRef,
    pub result: TestResult,
}

/// Derived classification of a single result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultLabel {
    Pass,
    Fail,
    Absent,
    Pending,
}

impl ResultLabel {
    pub const fn label(self) -> &'static str {
        match self {
            ResultLabel::Pass => "Pass",
            ResultLabel::Fail => "Fail",
            ResultLabel::Absent => "Absent",
            ResultLabel::Pending => "Pending Entry",
        }
    }
}
