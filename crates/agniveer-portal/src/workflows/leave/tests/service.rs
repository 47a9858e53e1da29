use super::common::*;
use crate::workflows::leave::domain::LeaveStatus;
use crate::workflows::leave::repository::LeaveRepository;
use crate::workflows::leave::{LeavePolicy, LeaveService, LeaveServiceError};
use crate::workflows::repository::RepositoryError;
use crate::workflows::validation::ValidationError;
use std::sync::Arc;

#[test]
fn apply_persists_pending_request() {
    let (service, repository) = build_service(mixed_history());

    let stored = service
        .apply(RECRUIT, application(date(2024, 3, 1), date(2024, 3, 10)))
        .expect("application accepted");

    assert_eq!(stored.status, LeaveStatus::Pending);
    assert_eq!(stored.recruit_id, RECRUIT);
    assert_eq!(stored.days(), 10);

    let history = repository.history(RECRUIT).expect("history loads");
    assert_eq!(history.len(), 3);
    assert_eq!(service.balance(RECRUIT).expect("balance").remaining, 15);
}

#[test]
fn apply_rejects_insufficient_balance_without_persisting() {
    let (service, repository) = build_service(mixed_history());

    match service.apply(RECRUIT, application(date(2024, 3, 1), date(2024, 3, 26))) {
        Err(LeaveServiceError::Rejected(ValidationError::InsufficientBalance {
            remaining: 25,
            ..
        })) => {}
        other => panic!("expected insufficient balance, got {other:?}"),
    }

    assert_eq!(repository.history(RECRUIT).expect("history").len(), 2);
}

#[test]
fn apply_rejects_reversed_span() {
    let (service, _) = build_service(Vec::new());

    match service.apply(RECRUIT, application(date(2024, 3, 10), date(2024, 3, 1))) {
        Err(LeaveServiceError::Rejected(ValidationError::MalformedSpan { .. })) => {}
        other => panic!("expected malformed span, got {other:?}"),
    }
}

#[test]
fn apply_revalidates_against_committed_history() {
    let exhausting = request(
        90,
        date(2024, 1, 1),
        date(2024, 1, 28),
        LeaveStatus::Pending,
    );
    let service = LeaveService::new(
        Arc::new(RacingRepository {
            committed: vec![exhausting],
        }),
        LeavePolicy::default(),
    );

    match service.apply(RECRUIT, application(date(2024, 6, 1), date(2024, 6, 5))) {
        Err(LeaveServiceError::Rejected(ValidationError::InsufficientBalance {
            requested: 5,
            remaining: 2,
        })) => {}
        other => panic!("expected commit-time rejection, got {other:?}"),
    }
}

#[test]
fn balance_reflects_requests_committed_elsewhere() {
    let (service, repository) = build_service(mixed_history());
    repository.inject(request(
        7,
        date(2024, 4, 1),
        date(2024, 4, 20),
        LeaveStatus::Pending,
    ));

    assert_eq!(service.balance(RECRUIT).expect("balance").remaining, 5);

    match service.apply(RECRUIT, application(date(2024, 5, 1), date(2024, 5, 6))) {
        Err(LeaveServiceError::Rejected(ValidationError::InsufficientBalance {
            remaining: 5,
            ..
        })) => {}
        other => panic!("expected insufficient balance, got {other:?}"),
    }
}

#[test]
fn check_does_not_persist() {
    let (service, repository) = build_service(mixed_history());

    let accepted = service
        .check(RECRUIT, &application(date(2024, 3, 1), date(2024, 3, 5)))
        .expect("check passes");
    assert_eq!(accepted.balance_after, 20);

    let again = service
        .check(RECRUIT, &application(date(2024, 3, 1), date(2024, 3, 5)))
        .expect("check passes twice");
    assert_eq!(accepted, again);
    assert_eq!(repository.history(RECRUIT).expect("history").len(), 2);
}

#[test]
fn repository_failures_propagate() {
    let service = LeaveService::new(Arc::new(UnavailableRepository), LeavePolicy::default());

    match service.balance(RECRUIT) {
        Err(LeaveServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable repository, got {other:?}"),
    }
}

#[test]
fn blank_reason_is_dropped() {
    let (service, _) = build_service(Vec::new());
    let mut blank = application(date(2024, 3, 1), date(2024, 3, 1));
    blank.reason = Some("   ".to_string());

    let stored = service.apply(RECRUIT, blank).expect("accepted");
    assert_eq!(stored.reason, None);
}
