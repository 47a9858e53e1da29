use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::workflows::grievance::domain::{
    Addressee, Grievance, GrievanceCategory, GrievanceDraft, GrievanceId,
};
use crate::workflows::grievance::repository::GrievanceRepository;
use crate::workflows::grievance::GrievanceService;
use crate::workflows::repository::RepositoryError;
use crate::workflows::RecruitId;

pub(super) const RECRUIT: RecruitId = RecruitId(17);

pub(super) fn submitted(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .and_then(|date| date.and_hms_opt(18, 30, 0))
        .expect("valid timestamp")
}

pub(super) fn draft(description: &str) -> GrievanceDraft {
    GrievanceDraft {
        addressed_to: Addressee::Co,
        category: GrievanceCategory::Admin,
        description: description.to_string(),
    }
}

pub(super) fn build_service() -> (
    GrievanceService<MemoryGrievanceRepository>,
    Arc<MemoryGrievanceRepository>,
) {
    let repository = Arc::new(MemoryGrievanceRepository::default());
    let service = GrievanceService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryGrievanceRepository {
    records: Arc<Mutex<Vec<Grievance>>>,
}

impl GrievanceRepository for MemoryGrievanceRepository {
    fn insert(&self, grievance: Grievance) -> Result<Grievance, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == grievance.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(grievance.clone());
        Ok(grievance)
    }

    fn list(&self, recruit_id: RecruitId) -> Result<Vec<Grievance>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut grievances: Vec<_> = guard
            .iter()
            .filter(|grievance| grievance.recruit_id == recruit_id)
            .cloned()
            .collect();
        grievances.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(grievances)
    }

    fn fetch(&self, id: GrievanceId) -> Result<Option<Grievance>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|grievance| grievance.id == id).cloned())
    }

    fn update(&self, grievance: Grievance) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == grievance.id) {
            Some(existing) => {
                *existing = grievance;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
