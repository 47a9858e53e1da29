use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::workflows::assessment::domain::{
    RosterEntry, ScheduledTest, TargetType, TestId, TestResult, TestStatus, TestType,
};
use crate::workflows::assessment::repository::AssessmentRepository;
use crate::workflows::assessment::schedule::TestDraft;
use crate::workflows::assessment::AssessmentService;
use crate::workflows::repository::RepositoryError;
use crate::workflows::{RecruitId, RecruitRef};

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid timestamp")
}

pub(super) fn recruit(id: u64, batch: &str, company: &str) -> RecruitRef {
    RecruitRef {
        id: RecruitId(id),
        service_id: format!("AGV-{id:05}"),
        name: format!("Agniveer {id}"),
        batch_no: Some(batch.to_string()),
        company: Some(company.to_string()),
    }
}

pub(super) fn recruits() -> Vec<RecruitRef> {
    vec![
        recruit(1, "B-24", "Alpha"),
        recruit(2, "B-24", "Bravo"),
        recruit(3, "B-25", "Alpha"),
    ]
}

pub(super) fn draft() -> TestDraft {
    TestDraft {
        name: "Quarterly BPET".to_string(),
        test_type: TestType::Pft,
        description: Some("5 km run and chin-ups".to_string()),
        scheduled_date: at(2024, 3, 4, 6),
        end_time: Some(at(2024, 3, 4, 9)),
        location: Some("Parade ground".to_string()),
        target_type: TargetType::Batch,
        target_value: Some("B-24".to_string()),
        instructor: Some("Sub Maj Rathore".to_string()),
        max_marks: Some(100.0),
        passing_marks: Some(50.0),
    }
}

pub(super) fn scheduled(id: u64, status: TestStatus) -> ScheduledTest {
    ScheduledTest {
        id: TestId(id),
        name: format!("Range day {id}"),
        test_type: TestType::Firing,
        description: None,
        scheduled_date: at(2024, 4, 10, 7),
        end_time: None,
        location: None,
        target_type: TargetType::All,
        target_value: None,
        instructor: None,
        max_marks: 50.0,
        passing_marks: 30.0,
        status,
        results_count: 0,
    }
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryAssessmentRepository>,
    Arc<MemoryAssessmentRepository>,
) {
    let repository = Arc::new(MemoryAssessmentRepository::with_recruits(recruits()));
    let service = AssessmentService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessmentRepository {
    recruits: Vec<RecruitRef>,
    tests: Arc<Mutex<BTreeMap<TestId, ScheduledTest>>>,
    results: Arc<Mutex<HashMap<(TestId, RecruitId), TestResult>>>,
}

impl MemoryAssessmentRepository {
    pub(super) fn with_recruits(recruits: Vec<RecruitRef>) -> Self {
        Self {
            recruits,
            ..Self::default()
        }
    }
}

impl AssessmentRepository for MemoryAssessmentRepository {
    fn insert_test(&self, test: ScheduledTest) -> Result<ScheduledTest, RepositoryError> {
        let mut guard = self.tests.lock().expect("tests mutex poisoned");
        if guard.contains_key(&test.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(test.id, test.clone());
        Ok(test)
    }

    fn tests(&self) -> Result<Vec<ScheduledTest>, RepositoryError> {
        let guard = self.tests.lock().expect("tests mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn test(&self, id: TestId) -> Result<Option<ScheduledTest>, RepositoryError> {
        let guard = self.tests.lock().expect("tests mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn roster(&self, id: TestId) -> Result<Vec<RosterEntry>, RepositoryError> {
        let test = self.test(id)?.ok_or(RepositoryError::NotFound)?;
        let results = self.results.lock().expect("results mutex poisoned");
        Ok(self
            .recruits
            .iter()
            .filter(|recruit| test.targets(recruit))
            .map(|recruit| RosterEntry {
                recruit: recruit.clone(),
                result: results
                    .get(&(id, recruit.id))
                    .cloned()
                    .unwrap_or_else(|| TestResult::pending(recruit.id)),
            })
            .collect())
    }

    fn upsert_result(&self, id: TestId, result: TestResult) -> Result<TestResult, RepositoryError> {
        let mut tests = self.tests.lock().expect("tests mutex poisoned");
        let test = tests.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        let mut results = self.results.lock().expect("results mutex poisoned");
        results.insert((id, result.recruit_id), result.clone());
        test.results_count = results.keys().filter(|(test_id, _)| *test_id == id).count() as u32;
        Ok(result)
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert_test(&self, _test: ScheduledTest) -> Result<ScheduledTest, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn tests(&self) -> Result<Vec<ScheduledTest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn test(&self, _id: TestId) -> Result<Option<ScheduledTest>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn roster(&self, _id: TestId) -> Result<Vec<RosterEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert_result(
        &self,
        _id: TestId,
        _result: TestResult,
    ) -> Result<TestResult, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
