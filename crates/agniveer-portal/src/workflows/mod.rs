pub mod assessment;
pub mod grievance;
pub mod import;
pub mod leave;
pub mod repository;
pub mod validation;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the recruit a leave, grievance, or result record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecruitId(pub u64);

impl fmt::Display for RecruitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recruit identity as joined onto rosters by the assessment collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitRef {
    pub id: RecruitId,
    pub service_id: String,
    pub name: String,
    #[serde(default)]
    pub batch_no: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}
