//! Integration tests for the safety-net batch pass.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::helpers::TestApp;

fn scan_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn ts(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, h, m, 0).unwrap()
}

#[tokio::test]
async fn test_batch_adjusts_only_periods_owing_a_break() {
    let Some(app) = TestApp::new().await else {
        return;
    };

    let org = app.create_organization("Acme").await;
    app.assign_six_hour_regulation(org).await;

    // One employee worked past the threshold, one stayed under it.
    let long_day = app.create_employee(org, "UTC").await;
    app.closed_period(long_day, org, ts(8, 0), 420).await;
    let short_day = app.create_employee(org, "UTC").await;
    app.closed_period(short_day, org, ts(9, 0), 300).await;

    let summary = app
        .safety_net
        .process_unprocessed_periods(Some(org), Some(scan_date()))
        .await
        .expect("safety-net pass failed");
    assert_eq!(summary.processed_count, 2);
    assert_eq!(summary.adjusted_count, 1);
    assert!(summary.errors.is_empty());

    // The split produced a second half for the long day only.
    assert_eq!(app.period_count(long_day).await, 2);
    assert_eq!(app.period_count(short_day).await, 1);

    // A repeat pass skips the already-adjusted halves and changes nothing.
    let rerun = app
        .safety_net
        .process_unprocessed_periods(Some(org), Some(scan_date()))
        .await
        .expect("safety-net rerun failed");
    assert_eq!(rerun.processed_count, 1);
    assert_eq!(rerun.adjusted_count, 0);
    assert!(rerun.errors.is_empty());
    assert_eq!(app.period_count(long_day).await, 2);
}
