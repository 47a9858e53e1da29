use agniveer_portal::workflows::assessment::{aggregate_stats, TestStatus};
use agniveer_portal::workflows::import::{LeaveHistoryImporter, TestScheduleImporter};
use agniveer_portal::workflows::leave::{remaining_balance, used_leave_days, LeaveStatus};
use agniveer_portal::workflows::RecruitId;

#[test]
fn bundled_leave_history_yields_expected_balance() {
    let data = include_bytes!("../data/leave_history.csv");
    let history = LeaveHistoryImporter::from_reader(&data[..], RecruitId(7))
        .expect("leave history imports");

    assert_eq!(history.len(), 4);
    assert_eq!(
        history
            .iter()
            .filter(|request| request.status == LeaveStatus::Rejected)
            .count(),
        1
    );
    assert_eq!(used_leave_days(&history), 17);
    assert_eq!(remaining_balance(&history), 13);
}

#[test]
fn bundled_training_schedule_aggregates() {
    let data = include_bytes!("../data/training_schedule.csv");
    let tests = TestScheduleImporter::from_reader(&data[..]).expect("schedule imports");

    assert_eq!(tests.len(), 6);
    assert!(tests
        .iter()
        .any(|test| test.status == TestStatus::InProgress));

    let stats = aggregate_stats(&tests);
    assert_eq!(stats.total, 6);
    assert_eq!(stats.upcoming, 2);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.pending_entry, stats.upcoming);
}

#[test]
fn schedule_import_reads_from_path() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/training_schedule.csv");
    let tests = TestScheduleImporter::from_path(path).expect("schedule imports");

    let weapons = tests
        .iter()
        .find(|test| test.name == "INSAS strip and assemble")
        .expect("weapons test present");
    assert_eq!(weapons.max_marks, 100.0);
    assert_eq!(weapons.passing_marks, 50.0);
    assert_eq!(weapons.target_value, None);
}
