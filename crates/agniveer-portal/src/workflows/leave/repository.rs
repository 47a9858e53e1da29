use super::domain::LeaveRequest;
use crate::workflows::repository::RepositoryError;
use crate::workflows::validation::ValidationError;
use crate::workflows::RecruitId;

/// Check run against the committed history immediately before an append.
pub type AppendPrecondition<'a> = &'a dyn Fn(&[LeaveRequest]) -> Result<(), ValidationError>;

/// Leave storage owned by the caller. Implementations must make
/// [`LeaveRepository::append_checked`] atomic per recruit so two concurrent
/// applications cannot both pass against a stale balance.
pub trait LeaveRepository: Send + Sync {
    /// Requests for a recruit in submission order.
    fn history(&self, recruit_id: RecruitId) -> Result<Vec<LeaveRequest>, RepositoryError>;

    /// Re-run `precondition` against the freshly committed history and append
    /// `request` only if it passes, without releasing the recruit's history in between.
    fn append_checked(
        &self,
        request: LeaveRequest,
        precondition: AppendPrecondition<'_>,
    ) -> Result<LeaveRequest, AppendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AppendError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
