use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::accounting::{AcceptedApplication, LeaveBalance, LeavePolicy};
use super::domain::{LeaveApplication, LeaveId, LeaveRequest};
use super::repository::{AppendError, LeaveRepository};
use crate::workflows::repository::RepositoryError;
use crate::workflows::validation::ValidationError;
use crate::workflows::RecruitId;

/// Service composing the leave policy with the caller's leave storage.
pub struct LeaveService<R> {
    repository: Arc<R>,
    policy: LeavePolicy,
}

static LEAVE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_leave_id() -> LeaveId {
    LeaveId(LEAVE_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

impl<R> LeaveService<R>
where
    R: LeaveRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: LeavePolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> &LeavePolicy {
        &self.policy
    }

    pub fn history(&self, recruit_id: RecruitId) -> Result<Vec<LeaveRequest>, LeaveServiceError> {
        Ok(self.repository.history(recruit_id)?)
    }

    /// Balance recomputed from the authoritative history on every call.
    pub fn balance(&self, recruit_id: RecruitId) -> Result<LeaveBalance, LeaveServiceError> {
        let history = self.repository.history(recruit_id)?;
        Ok(self.policy.balance(&history))
    }

    /// Dry-run validation without persisting anything.
    pub fn check(
        &self,
        recruit_id: RecruitId,
        application: &LeaveApplication,
    ) -> Result<AcceptedApplication, LeaveServiceError> {
        let span = application.span()?;
        let history = self.repository.history(recruit_id)?;
        Ok(self.policy.validate_application(&history, &span)?)
    }

    /// Validate and persist a new pending request. The rule check is repeated
    /// inside the repository's commit so a concurrent application cannot slip
    /// past a stale balance.
    pub fn apply(
        &self,
        recruit_id: RecruitId,
        application: LeaveApplication,
    ) -> Result<LeaveRequest, LeaveServiceError> {
        let span = application.span()?;
        let history = self.repository.history(recruit_id)?;
        if let Err(rejection) = self.policy.validate_application(&history, &span) {
            warn!(
                %recruit_id,
                start = %span.start(),
                end = %span.end(),
                kind = rejection.kind(),
                "leave application rejected"
            );
            return Err(rejection.into());
        }

        let request = application.into_request(next_leave_id(), recruit_id);
        let policy = self.policy;
        let stored = self
            .repository
            .append_checked(request, &|committed: &[LeaveRequest]| {
                policy.validate_application(committed, &span).map(|_| ())
            })
            .map_err(|err| {
                if let AppendError::Rejected(rejection) = &err {
                    warn!(
                        %recruit_id,
                        kind = rejection.kind(),
                        "leave application lost commit race"
                    );
                }
                LeaveServiceError::from(err)
            })?;

        info!(
            %recruit_id,
            leave_id = %stored.id,
            days = stored.days(),
            leave_type = stored.leave_type.label(),
            "leave application recorded"
        );
        debug!(?stored, "pending leave request");

        Ok(stored)
    }
}

/// Error raised by the leave service.
#[derive(Debug, thiserror::Error)]
pub enum LeaveServiceError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AppendError> for LeaveServiceError {
    fn from(value: AppendError) -> Self {
        match value {
            AppendError::Rejected(rejection) => Self::Rejected(rejection),
            AppendError::Repository(error) => Self::Repository(error),
        }
    }
}
