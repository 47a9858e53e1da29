use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use super::domain::{Grievance, GrievanceDraft, GrievanceError, GrievanceId};
use super::repository::GrievanceRepository;
use crate::workflows::repository::RepositoryError;
use crate::workflows::RecruitId;

pub struct GrievanceService<R> {
    repository: Arc<R>,
}

static GRIEVANCE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_grievance_id() -> GrievanceId {
    GrievanceId(GRIEVANCE_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

impl<R> GrievanceService<R>
where
    R: GrievanceRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn file(
        &self,
        recruit_id: RecruitId,
        draft: GrievanceDraft,
    ) -> Result<Grievance, GrievanceServiceError> {
        self.file_at(recruit_id, draft, Local::now().naive_local())
    }

    /// File a grievance with an explicit submission time.
    pub fn file_at(
        &self,
        recruit_id: RecruitId,
        draft: GrievanceDraft,
        submitted_at: NaiveDateTime,
    ) -> Result<Grievance, GrievanceServiceError> {
        let grievance = draft
            .into_grievance(next_grievance_id(), recruit_id, submitted_at)
            .map_err(|err| {
                warn!(%recruit_id, error = %err, "grievance rejected");
                err
            })?;
        let stored = self.repository.insert(grievance)?;
        info!(
            %recruit_id,
            grievance_id = %stored.id,
            addressed_to = stored.addressed_to.label(),
            category = stored.category.label(),
            "grievance filed"
        );
        Ok(stored)
    }

    pub fn list(&self, recruit_id: RecruitId) -> Result<Vec<Grievance>, GrievanceServiceError> {
        Ok(self.repository.list(recruit_id)?)
    }

    /// Close a grievance with the addressee's notes.
    pub fn resolve(
        &self,
        recruit_id: RecruitId,
        id: GrievanceId,
        notes: &str,
    ) -> Result<Grievance, GrievanceServiceError> {
        let mut grievance = self
            .repository
            .fetch(id)?
            .filter(|grievance| grievance.recruit_id == recruit_id)
            .ok_or(RepositoryError::NotFound)?;
        grievance.resolve(notes)?;
        self.repository.update(grievance.clone())?;
        info!(%recruit_id, grievance_id = %id, "grievance resolved");
        Ok(grievance)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GrievanceServiceError {
    #[error(transparent)]
    Invalid(#[from] GrievanceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
