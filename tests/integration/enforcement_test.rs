//! Integration tests for the break enforcement action.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use shiftguard_compliance::SYSTEM_ACTOR;
use shiftguard_compliance::enforcement::{
    AdjustmentSummary, EnforcementOutcome, EnforcementRequest, SkipReason,
};
use shiftguard_entity::ledger::chain::verify_chain;
use shiftguard_entity::ledger::model::ClockEventKind;

use crate::helpers::TestApp;

fn ts(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, h, m, 0).unwrap()
}

fn request(employee_id: Uuid, work_period_id: Uuid) -> EnforcementRequest {
    EnforcementRequest {
        employee_id,
        work_period_id,
        session_duration_minutes: None,
        timezone: None,
        actor_id: SYSTEM_ACTOR,
    }
}

fn expect_adjusted(outcome: EnforcementOutcome) -> AdjustmentSummary {
    match outcome {
        EnforcementOutcome::Adjusted(summary) => summary,
        EnforcementOutcome::Skipped { reason } => {
            panic!("Expected an adjustment, got skip: {reason}")
        }
    }
}

#[tokio::test]
async fn test_split_rebinds_clock_entries_across_both_halves() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let org = app.create_organization("Acme").await;
    app.assign_six_hour_regulation(org).await;
    let employee = app.create_employee(org, "UTC").await;

    // 7h session: 30 min owed, break carved out at the 6h mark.
    let period = app.closed_period(employee, org, ts(8, 0), 420).await;
    let original_out = period.clock_out_entry_id.expect("period is closed");

    let outcome = app
        .enforcement
        .enforce(&request(employee, period.id))
        .await
        .expect("enforcement failed");
    let summary = expect_adjusted(outcome);
    assert_eq!(summary.break_start, ts(14, 0));
    assert_eq!(summary.break_end, ts(14, 30));

    let first = app
        .periods
        .find_by_id(period.id)
        .await
        .expect("lookup failed")
        .expect("first half missing");
    let second = app
        .periods
        .find_by_id(summary.second_half_period_id)
        .await
        .expect("lookup failed")
        .expect("second half missing");

    // The first half ends at the break and is bounded by the synthetic
    // clock-out, not the original one.
    assert_eq!(first.end_time, Some(summary.break_start));
    assert_eq!(first.duration_minutes, Some(360));
    let first_out = first.clock_out_entry_id.expect("first half is closed");
    assert_ne!(first_out, original_out);

    // The original clock-out moves to the second half.
    assert_eq!(second.start_time, summary.break_end);
    assert_eq!(second.clock_out_entry_id, Some(original_out));
    assert_eq!(second.duration_minutes, Some(30));

    let chain = app
        .ledger
        .chain_for_employee(employee)
        .await
        .expect("chain fetch failed");
    assert_eq!(chain.len(), 4);
    assert!(verify_chain(&chain).is_intact);

    let first_out_entry = chain.iter().find(|e| e.id == first_out).unwrap();
    assert_eq!(first_out_entry.kind, ClockEventKind::ClockOut);
    assert_eq!(first_out_entry.timestamp, summary.break_start);

    let second_in_entry = chain.iter().find(|e| e.id == second.clock_in_entry_id).unwrap();
    assert_eq!(second_in_entry.kind, ClockEventKind::ClockIn);
    assert_eq!(second_in_entry.timestamp, summary.break_end);

    // Every ledger entry bounds exactly one half; none is left dangling.
    let mut referenced = vec![
        first.clock_in_entry_id,
        first_out,
        second.clock_in_entry_id,
        original_out,
    ];
    referenced.sort();
    let mut chain_ids: Vec<Uuid> = chain.iter().map(|e| e.id).collect();
    chain_ids.sort();
    assert_eq!(referenced, chain_ids);
}

#[tokio::test]
async fn test_rerun_on_adjusted_period_changes_nothing() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let org = app.create_organization("Acme").await;
    app.assign_six_hour_regulation(org).await;
    let employee = app.create_employee(org, "UTC").await;

    let period = app.closed_period(employee, org, ts(8, 0), 420).await;
    let outcome = app
        .enforcement
        .enforce(&request(employee, period.id))
        .await
        .expect("enforcement failed");
    assert!(outcome.was_adjusted());

    let before = app
        .periods
        .find_by_id(period.id)
        .await
        .expect("lookup failed")
        .expect("first half missing");

    let rerun = app
        .enforcement
        .enforce(&request(employee, period.id))
        .await
        .expect("rerun failed");
    assert!(!rerun.was_adjusted());
    match rerun {
        EnforcementOutcome::Skipped { reason } => {
            assert_eq!(reason, SkipReason::AlreadyAdjusted);
        }
        EnforcementOutcome::Adjusted(_) => panic!("rerun adjusted the period again"),
    }

    // No new rows, no new ledger entries, no field drift.
    let after = app
        .periods
        .find_by_id(period.id)
        .await
        .expect("lookup failed")
        .expect("first half missing");
    assert_eq!(after.end_time, before.end_time);
    assert_eq!(after.duration_minutes, before.duration_minutes);
    assert_eq!(after.clock_out_entry_id, before.clock_out_entry_id);
    assert_eq!(after.auto_adjusted_at, before.auto_adjusted_at);

    assert_eq!(app.period_count(employee).await, 2);
    let chain = app
        .ledger
        .chain_for_employee(employee)
        .await
        .expect("chain fetch failed");
    assert_eq!(chain.len(), 4);
}
