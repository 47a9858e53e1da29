use super::domain::{Grievance, GrievanceId};
use crate::workflows::repository::RepositoryError;
use crate::workflows::RecruitId;

pub trait GrievanceRepository: Send + Sync {
    fn insert(&self, grievance: Grievance) -> Result<Grievance, RepositoryError>;
    /// Grievances filed by a recruit, newest first.
    fn list(&self, recruit_id: RecruitId) -> Result<Vec<Grievance>, RepositoryError>;
    fn fetch(&self, id: GrievanceId) -> Result<Option<Grievance>, RepositoryError>;
    fn update(&self, grievance: Grievance) -> Result<(), RepositoryError>;
}
