use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::RecruitId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrievanceId(pub u64);

impl fmt::Display for GrievanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrievanceCategory {
    Admin,
    Medical,
    Personal,
}

impl GrievanceCategory {
    pub const fn label(self) -> &'static str {
        match self {
            GrievanceCategory::Admin => "ADMIN",
            GrievanceCategory::Medical => "MEDICAL",
            GrievanceCategory::Personal => "PERSONAL",
        }
    }
}

/// Officer a grievance is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Addressee {
    Co,
    Commander,
}

impl Addressee {
    pub const fn label(self) -> &'static str {
        match self {
            Addressee::Co => "CO",
            Addressee::Commander => "COMMANDER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrievanceStatus {
    Open,
    Pending,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrievanceError {
    #[error("grievance description must not be empty")]
    EmptyDescription,
    #[error("resolution notes must not be empty")]
    EmptyResolution,
    #[error("grievance {0} is already resolved")]
    AlreadyResolved(GrievanceId),
}

/// A filed grievance. `resolution_notes` is only ever set by [`Grievance::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grievance {
    pub id: GrievanceId,
    pub recruit_id: RecruitId,
    pub submitted_at: NaiveDateTime,
    pub addressed_to: Addressee,
    #[serde(rename = "type")]
    pub category: GrievanceCategory,
    pub description: String,
    pub status: GrievanceStatus,
    #[serde(default)]
    pub resolution_notes: Option<String>,
}

impl Grievance {
    pub fn resolve(&mut self, notes: &str) -> Result<(), GrievanceError> {
        if self.status == GrievanceStatus::Resolved {
            return Err(GrievanceError::AlreadyResolved(self.id));
        }
        let notes = notes.trim();
        if notes.is_empty() {
            return Err(GrievanceError::EmptyResolution);
        }
        self.status = GrievanceStatus::Resolved;
        self.resolution_notes = Some(notes.to_string());
        Ok(())
    }
}

/// Grievance as submitted from the recruit's form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrievanceDraft {
    pub addressed_to: Addressee,
    #[serde(rename = "type")]
    pub category: GrievanceCategory,
    pub description: String,
}

impl GrievanceDraft {
    pub fn into_grievance(
        self,
        id: GrievanceId,
        recruit_id: RecruitId,
        submitted_at: NaiveDateTime,
    ) -> Result<Grievance, GrievanceError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(GrievanceError::EmptyDescription);
        }

        Ok(Grievance {
            id,
            recruit_id,
            submitted_at,
            addressed_to: self.addressed_to,
            category: self.category,
            description: description.to_string(),
            status: GrievanceStatus::Open,
            resolution_notes: None,
        })
    }
}
