use crate::infra::{
    sample_recruits, InMemoryGrievanceBook, InMemoryLeaveBook, InMemoryTrainingBook,
};
use crate::routes::{evaluate_leave, LeaveDecision, LeaveEvaluation};
use agniveer_portal::config::AppConfig;
use agniveer_portal::error::AppError;
use agniveer_portal::workflows::assessment::{
    accepts_result_entry, aggregate_stats, AssessmentService, ResultEntry, RosterView,
    TargetType, TestDraft, TestType, TrainingStats,
};
use agniveer_portal::workflows::grievance::{
    Addressee, GrievanceCategory, GrievanceDraft, GrievanceService,
};
use agniveer_portal::workflows::import::{LeaveHistoryImporter, TestScheduleImporter};
use agniveer_portal::workflows::leave::{
    LeaveApplication, LeaveId, LeaveRequest, LeaveService, LeaveStatus, LeaveType,
};
use agniveer_portal::workflows::RecruitId;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct LeaveCheckArgs {
    /// Leave history export (id,leave_type,start_date,end_date,reason,status)
    #[arg(long)]
    pub(crate) history: PathBuf,
    /// First day of the requested leave (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) start: NaiveDate,
    /// Last day of the requested leave (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) end: NaiveDate,
    /// Recruit the history belongs to
    #[arg(long, default_value_t = 0)]
    pub(crate) recruit: u64,
}

#[derive(Args, Debug)]
pub(crate) struct TrainingStatsArgs {
    /// Training calendar export
    #[arg(long)]
    pub(crate) schedule: PathBuf,
}

pub(crate) fn run_leave_check(args: LeaveCheckArgs) -> Result<(), AppError> {
    let LeaveCheckArgs {
        history,
        start,
        end,
        recruit,
    } = args;

    let policy = AppConfig::load()?.leave;
    let history = LeaveHistoryImporter::from_path(history, RecruitId(recruit))?;
    let evaluation = evaluate_leave(&policy, &history, start, end);

    println!("Leave check for {start} to {end}");
    println!("- {} request(s) on record", history.len());
    render_evaluation(&evaluation);
    Ok(())
}

pub(crate) fn run_training_stats(args: TrainingStatsArgs) -> Result<(), AppError> {
    let tests = TestScheduleImporter::from_path(args.schedule)?;
    let stats = aggregate_stats(&tests);

    println!("Training calendar");
    render_stats(&stats);

    let open: Vec<_> = tests.iter().filter(|test| accepts_result_entry(test)).collect();
    if !open.is_empty() {
        println!("Open for result entry:");
        for test in open {
            println!(
                "  - #{} {} ({}) {} | pass {}/{}",
                test.id,
                test.name,
                test.test_type.label(),
                test.scheduled_date.format("%d %b %Y %H:%M"),
                test.passing_marks,
                test.max_marks
            );
        }
    }
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    println!("Agniveer portal demo");
    leave_walkthrough();
    training_walkthrough();
    grievance_walkthrough();
    Ok(())
}

fn leave_walkthrough() {
    let recruit = RecruitId(1);
    let seeded = vec![
        LeaveRequest {
            id: LeaveId(9001),
            recruit_id: recruit,
            leave_type: LeaveType::Casual,
            start_date: demo_date(2024, 1, 8),
            end_date: demo_date(2024, 1, 17),
            reason: Some("Sister's wedding".to_string()),
            status: LeaveStatus::Approved,
        },
        LeaveRequest {
            id: LeaveId(9002),
            recruit_id: recruit,
            leave_type: LeaveType::Casual,
            start_date: demo_date(2024, 2, 5),
            end_date: demo_date(2024, 2, 14),
            reason: None,
            status: LeaveStatus::Rejected,
        },
    ];
    let service = LeaveService::new(
        Arc::new(InMemoryLeaveBook::seeded(seeded)),
        Default::default(),
    );

    println!("\nLeave accounting (recruit {recruit})");
    print_balance(&service, recruit);

    for (leave_type, start, end) in [
        (LeaveType::Medical, demo_date(2024, 3, 4), demo_date(2024, 3, 15)),
        (LeaveType::Casual, demo_date(2024, 5, 1), demo_date(2024, 5, 10)),
        (LeaveType::Special, demo_date(2024, 5, 1), demo_date(2024, 5, 8)),
    ] {
        let application = LeaveApplication {
            leave_type,
            start_date: start,
            end_date: end,
            reason: None,
        };
        match service.apply(recruit, application) {
            Ok(request) => println!(
                "- {} {start} to {end}: accepted as pending request #{} ({} days)",
                leave_type.label(),
                request.id,
                request.days()
            ),
            Err(err) => println!("- {} {start} to {end}: rejected ({err})", leave_type.label()),
        }
    }
    print_balance(&service, recruit);
}

fn print_balance(service: &LeaveService<InMemoryLeaveBook>, recruit: RecruitId) {
    match service.balance(recruit) {
        Ok(balance) => println!(
            "- balance {}/{} days remaining{}",
            balance.remaining,
            balance.entitlement,
            if balance.low_balance { " (low)" } else { "" }
        ),
        Err(err) => println!("- balance unavailable: {err}"),
    }
}

fn training_walkthrough() {
    let service = AssessmentService::new(Arc::new(InMemoryTrainingBook::new(sample_recruits())));
    println!("\nTraining assessment");

    let draft = TestDraft {
        name: "Quarterly BPET".to_string(),
        test_type: TestType::Pft,
        description: Some("5 km run, chin-ups, 9 ft ditch".to_string()),
        scheduled_date: demo_date(2024, 3, 4).and_hms_opt(6, 0, 0).unwrap_or_default(),
        end_time: None,
        location: Some("Parade ground".to_string()),
        target_type: TargetType::Batch,
        target_value: Some("B-24".to_string()),
        instructor: Some("Sub Maj Rathore".to_string()),
        max_marks: None,
        passing_marks: None,
    };
    let test = match service.schedule(draft) {
        Ok(test) => test,
        Err(err) => {
            println!("- scheduling failed: {err}");
            return;
        }
    };
    println!(
        "- scheduled #{} {} for batch {}",
        test.id,
        test.name,
        test.target_value.as_deref().unwrap_or("-")
    );

    for entry in [
        ResultEntry {
            recruit_id: RecruitId(1),
            score: Some(78.0),
            is_absent: false,
        },
        ResultEntry {
            recruit_id: RecruitId(2),
            score: Some(41.5),
            is_absent: false,
        },
        ResultEntry {
            recruit_id: RecruitId(4),
            score: Some(90.0),
            is_absent: false,
        },
    ] {
        if let Err(err) = service.record_result(test.id, entry) {
            println!("- result not saved: {err}");
        }
    }

    match service.roster(test.id) {
        Ok(view) => render_roster(&view),
        Err(err) => println!("- roster unavailable: {err}"),
    }
    if let Ok(stats) = service.stats() {
        render_stats(&stats);
    }
}

fn grievance_walkthrough() {
    let service = GrievanceService::new(Arc::new(InMemoryGrievanceBook::default()));
    let recruit = RecruitId(3);
    println!("\nGrievances (recruit {recruit})");

    let filed = service.file(
        recruit,
        GrievanceDraft {
            addressed_to: Addressee::Co,
            category: GrievanceCategory::Admin,
            description: "Kit allowance not credited for February".to_string(),
        },
    );
    match filed {
        Ok(grievance) => {
            println!(
                "- filed #{} to {} ({})",
                grievance.id,
                grievance.addressed_to.label(),
                grievance.category.label()
            );
            match service.resolve(recruit, grievance.id, "Allowance credited with March pay") {
                Ok(resolved) => println!(
                    "- resolved: {}",
                    resolved.resolution_notes.as_deref().unwrap_or_default()
                ),
                Err(err) => println!("- resolution failed: {err}"),
            }
        }
        Err(err) => println!("- grievance not filed: {err}"),
    }

    if let Ok(grievances) = service.list(recruit) {
        println!("- {} grievance(s) on record", grievances.len());
    }
}

fn render_evaluation(evaluation: &LeaveEvaluation) {
    let balance = &evaluation.balance;
    println!(
        "- used {} of {} days, {} remaining{}",
        balance.used,
        balance.entitlement,
        balance.remaining,
        if balance.low_balance { " (low balance)" } else { "" }
    );
    match evaluation.latest_end_date {
        Some(date) => println!("- latest permissible end date: {date}"),
        None => println!("- no leave days available"),
    }
    match (evaluation.decision, &evaluation.accepted, &evaluation.rejection) {
        (LeaveDecision::Accepted, Some(accepted), _) => println!(
            "Decision: accepted ({} days, balance {} -> {})",
            accepted.requested_days, accepted.balance_before, accepted.balance_after
        ),
        (_, _, Some(rejection)) => println!("Decision: rejected ({rejection})"),
        _ => println!("Decision: {:?}", evaluation.decision),
    }
}

fn render_roster(view: &RosterView) {
    println!("- roster for #{} {}:", view.test.id, view.test.name);
    for row in &view.entries {
        let score = row
            .result
            .score
            .map(|score| format!("{score}/{}", view.test.max_marks))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    {} {:<16} {:>10}  {}",
            row.recruit.service_id, row.recruit.name, score, row.label_text
        );
    }
    println!(
        "- {} pass | {} fail | {} absent | {} pending",
        view.summary.pass, view.summary.fail, view.summary.absent, view.summary.pending
    );
}

fn render_stats(stats: &TrainingStats) {
    println!(
        "- {} tests | {} upcoming | {} completed | {} pending entry",
        stats.total, stats.upcoming, stats.completed, stats.pending_entry
    );
}

fn demo_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
