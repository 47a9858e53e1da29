use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::leave::domain::{
    LeaveApplication, LeaveId, LeaveRequest, LeaveStatus, LeaveType,
};
use crate::workflows::leave::repository::{AppendError, AppendPrecondition, LeaveRepository};
use crate::workflows::leave::{LeavePolicy, LeaveService};
use crate::workflows::repository::RepositoryError;
use crate::workflows::RecruitId;

pub(super) const RECRUIT: RecruitId = RecruitId(41);

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn request(
    id: u64,
    start: NaiveDate,
    end: NaiveDate,
    status: LeaveStatus,
) -> LeaveRequest {
    LeaveRequest {
        id: LeaveId(id),
        recruit_id: RECRUIT,
        leave_type: LeaveType::Casual,
        start_date: start,
        end_date: end,
        reason: Some("Family function".to_string()),
        status,
    }
}

/// One approved five-day request and one rejected ten-day request.
pub(super) fn mixed_history() -> Vec<LeaveRequest> {
    vec![
        request(1, date(2024, 1, 1), date(2024, 1, 5), LeaveStatus::Approved),
        request(2, date(2024, 2, 1), date(2024, 2, 10), LeaveStatus::Rejected),
    ]
}

pub(super) fn application(start: NaiveDate, end: NaiveDate) -> LeaveApplication {
    LeaveApplication {
        leave_type: LeaveType::Casual,
        start_date: start,
        end_date: end,
        reason: Some("Harvest at home".to_string()),
    }
}

pub(super) fn build_service(
    history: Vec<LeaveRequest>,
) -> (LeaveService<MemoryLeaveRepository>, Arc<MemoryLeaveRepository>) {
    let repository = Arc::new(MemoryLeaveRepository::seeded(history));
    let service = LeaveService::new(repository.clone(), LeavePolicy::default());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryLeaveRepository {
    pub(super) records: Arc<Mutex<HashMap<RecruitId, Vec<LeaveRequest>>>>,
}

impl MemoryLeaveRepository {
    pub(super) fn seeded(history: Vec<LeaveRequest>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.records.lock().expect("repository mutex poisoned");
            for request in history {
                guard.entry(request.recruit_id).or_default().push(request);
            }
        }
        repository
    }

    /// Simulates a commit that landed after the service read the history.
    pub(super) fn inject(&self, request: LeaveRequest) {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .entry(request.recruit_id)
            .or_default()
            .push(request);
    }
}

impl LeaveRepository for MemoryLeaveRepository {
    fn history(&self, recruit_id: RecruitId) -> Result<Vec<LeaveRequest>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(&recruit_id).cloned().unwrap_or_default())
    }

    fn append_checked(
        &self,
        request: LeaveRequest,
        precondition: AppendPrecondition<'_>,
    ) -> Result<LeaveRequest, AppendError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let history = guard.entry(request.recruit_id).or_default();
        precondition(history.as_slice())?;
        history.push(request.clone());
        Ok(request)
    }
}

/// Repository whose history read is stale: it reports nothing, yet the commit
/// sees a request that already exhausted the balance.
pub(super) struct RacingRepository {
    pub(super) committed: Vec<LeaveRequest>,
}

impl LeaveRepository for RacingRepository {
    fn history(&self, _recruit_id: RecruitId) -> Result<Vec<LeaveRequest>, RepositoryError> {
        Ok(Vec::new())
    }

    fn append_checked(
        &self,
        request: LeaveRequest,
        precondition: AppendPrecondition<'_>,
    ) -> Result<LeaveRequest, AppendError> {
        precondition(self.committed.as_slice())?;
        Ok(request)
    }
}

pub(super) struct UnavailableRepository;

impl LeaveRepository for UnavailableRepository {
    fn history(&self, _recruit_id: RecruitId) -> Result<Vec<LeaveRequest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn append_checked(
        &self,
        _request: LeaveRequest,
        _precondition: AppendPrecondition<'_>,
    ) -> Result<LeaveRequest, AppendError> {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
