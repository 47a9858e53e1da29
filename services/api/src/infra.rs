use agniveer_portal::workflows::assessment::{
    AssessmentRepository, RosterEntry, ScheduledTest, TestId, TestResult,
};
use agniveer_portal::workflows::grievance::{Grievance, GrievanceId, GrievanceRepository};
use agniveer_portal::workflows::leave::{
    AppendError, AppendPrecondition, LeavePolicy, LeaveRepository, LeaveRequest,
};
use agniveer_portal::workflows::repository::RepositoryError;
use agniveer_portal::workflows::{RecruitId, RecruitRef};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) policy: LeavePolicy,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeaveBook {
    records: Arc<Mutex<HashMap<RecruitId, Vec<LeaveRequest>>>>,
}

impl InMemoryLeaveBook {
    pub(crate) fn seeded(history: Vec<LeaveRequest>) -> Self {
        let book = Self::default();
        {
            let mut guard = book.records.lock().expect("leave mutex poisoned");
            for request in history {
                guard.entry(request.recruit_id).or_default().push(request);
            }
        }
        book
    }
}

impl LeaveRepository for InMemoryLeaveBook {
    fn history(&self, recruit_id: RecruitId) -> Result<Vec<LeaveRequest>, RepositoryError> {
        let guard = self.records.lock().expect("leave mutex poisoned");
        Ok(guard.get(&recruit_id).cloned().unwrap_or_default())
    }

    fn append_checked(
        &self,
        request: LeaveRequest,
        precondition: AppendPrecondition<'_>,
    ) -> Result<LeaveRequest, AppendError> {
        let mut guard = self.records.lock().expect("leave mutex poisoned");
        let history = guard.entry(request.recruit_id).or_default();
        precondition(history.as_slice())?;
        history.push(request.clone());
        Ok(request)
    }
}

#[derive(Default)]
struct TrainingState {
    tests: BTreeMap<TestId, ScheduledTest>,
    results: HashMap<(TestId, RecruitId), TestResult>,
}

/// Training calendar held in memory, joined against a fixed recruit roll.
#[derive(Default, Clone)]
pub(crate) struct InMemoryTrainingBook {
    recruits: Arc<Vec<RecruitRef>>,
    state: Arc<Mutex<TrainingState>>,
}

impl InMemoryTrainingBook {
    pub(crate) fn new(recruits: Vec<RecruitRef>) -> Self {
        Self {
            recruits: Arc::new(recruits),
            state: Arc::default(),
        }
    }
}

impl AssessmentRepository for InMemoryTrainingBook {
    fn insert_test(&self, test: ScheduledTest) -> Result<ScheduledTest, RepositoryError> {
        let mut guard = self.state.lock().expect("training mutex poisoned");
        if guard.tests.contains_key(&test.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.tests.insert(test.id, test.clone());
        Ok(test)
    }

    fn tests(&self) -> Result<Vec<ScheduledTest>, RepositoryError> {
        let guard = self.state.lock().expect("training mutex poisoned");
        Ok(guard.tests.values().cloned().collect())
    }

    fn test(&self, id: TestId) -> Result<Option<ScheduledTest>, RepositoryError> {
        let guard = self.state.lock().expect("training mutex poisoned");
        Ok(guard.tests.get(&id).cloned())
    }

    fn roster(&self, id: TestId) -> Result<Vec<RosterEntry>, RepositoryError> {
        let guard = self.state.lock().expect("training mutex poisoned");
        let test = guard.tests.get(&id).ok_or(RepositoryError::NotFound)?;
        Ok(self
            .recruits
            .iter()
            .filter(|recruit| test.targets(recruit))
            .map(|recruit| RosterEntry {
                recruit: recruit.clone(),
                result: guard
                    .results
                    .get(&(id, recruit.id))
                    .cloned()
                    .unwrap_or_else(|| TestResult::pending(recruit.id)),
            })
            .collect())
    }

    fn upsert_result(&self, id: TestId, result: TestResult) -> Result<TestResult, RepositoryError> {
        let mut guard = self.state.lock().expect("training mutex poisoned");
        if !guard.tests.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        guard.results.insert((id, result.recruit_id), result.clone());
        let count = guard.results.keys().filter(|(test_id, _)| *test_id == id).count();
        if let Some(test) = guard.tests.get_mut(&id) {
            test.results_count = u32::try_from(count).unwrap_or(u32::MAX);
        }
        Ok(result)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryGrievanceBook {
    records: Arc<Mutex<Vec<Grievance>>>,
}

impl GrievanceRepository for InMemoryGrievanceBook {
    fn insert(&self, grievance: Grievance) -> Result<Grievance, RepositoryError> {
        let mut guard = self.records.lock().expect("grievance mutex poisoned");
        if guard.iter().any(|existing| existing.id == grievance.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(grievance.clone());
        Ok(grievance)
    }

    fn list(&self, recruit_id: RecruitId) -> Result<Vec<Grievance>, RepositoryError> {
        let guard = self.records.lock().expect("grievance mutex poisoned");
        let mut grievances: Vec<_> = guard
            .iter()
            .filter(|grievance| grievance.recruit_id == recruit_id)
            .cloned()
            .collect();
        grievances.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(grievances)
    }

    fn fetch(&self, id: GrievanceId) -> Result<Option<Grievance>, RepositoryError> {
        let guard = self.records.lock().expect("grievance mutex poisoned");
        Ok(guard.iter().find(|grievance| grievance.id == id).cloned())
    }

    fn update(&self, grievance: Grievance) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("grievance mutex poisoned");
        let existing = guard
            .iter_mut()
            .find(|existing| existing.id == grievance.id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = grievance;
        Ok(())
    }
}

/// Recruit roll used by the server and the demo until a personnel source is wired in.
pub(crate) fn sample_recruits() -> Vec<RecruitRef> {
    [
        (1, "AGV-24-001", "Arjun Yadav", "B-24", "Alpha"),
        (2, "AGV-24-002", "Imran Sheikh", "B-24", "Alpha"),
        (3, "AGV-24-003", "Lalremsiama", "B-24", "Bravo"),
        (4, "AGV-25-004", "Karan Gill", "B-25", "Alpha"),
        (5, "AGV-25-005", "Tenzing Bhutia", "B-25", "Bravo"),
    ]
    .into_iter()
    .map(|(id, service_id, name, batch, company)| RecruitRef {
        id: RecruitId(id),
        service_id: service_id.to_string(),
        name: name.to_string(),
        batch_no: Some(batch.to_string()),
        company: Some(company.to_string()),
    })
    .collect()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}
