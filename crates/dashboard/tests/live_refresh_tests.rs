//! Live refresh: timer ticks, suspension by free-text queries, the
//! "new entries" notice and shutdown. All tests run on paused time.

mod common;

use chrono::Utc;
use common::*;
use sentinel_client::ClientError;
use sentinel_dashboard::QuickRange;
use std::time::Duration;

fn live(interval_secs: u64) -> DashboardOptions {
    DashboardOptions {
        live: true,
        refresh_interval: Duration::from_secs(interval_secs),
        ..DashboardOptions::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_tick_fetches_with_extended_end() {
    let mut h = harness(live(10));
    h.backend.push(Reply::ok(result_with(5, &["info"])));

    let dash = &mut h.dashboard;
    let page_before = dash.ui().page;
    let start_before = dash.ui().start_time;

    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::TickDispatched { .. })
    ));
    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::Applied {
            kind: FetchKind::Live,
            total: 5,
            ..
        })
    ));

    let sent = h.backend.last_query().unwrap();
    assert!(sent.end_time > Utc::now() + chrono::Duration::hours(23));
    assert_eq!(sent.start_time, start_before);
    assert_eq!(sent.page, page_before);
    assert!(dash.refresh_state().last_fetch_at.is_some());
    assert!(!dash.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_longest_preset_keeps_ticking() {
    let mut h = harness(live(10));
    h.backend.push(Reply::ok(result_with(4, &["info"])));
    h.backend.push(Reply::ok(result_with(6, &["info"])));

    let dash = &mut h.dashboard;
    dash.apply_quick_range(QuickRange::Last180Days);

    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::TickDispatched { .. })
    ));
    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::Applied { total: 4, .. })
    ));

    // The margin carries the live window past 180 days.
    let sent = h.backend.last_query().unwrap();
    assert!(sent.end_time - sent.start_time > chrono::Duration::days(180));

    // A manual refresh of the extended window is not a validation error.
    let seq = dash.refresh().unwrap();
    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::Applied { seq: applied, total: 6, .. }) if applied == seq
    ));
    assert_eq!(h.backend.queries().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_tick_failure_keeps_timer_armed() {
    let mut h = harness(live(10));
    h.backend.push(Reply::err(ClientError::Timeout));
    h.backend.push(Reply::ok(result_with(1, &[])));

    let dash = &mut h.dashboard;
    dash.next_event().await;
    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::Failed {
            kind: FetchKind::Live,
            ..
        })
    ));
    assert_eq!(dash.scheduler_state(), SchedulerState::Armed);
    assert!(dash.error().is_some());

    // The next tick fires on schedule and its success clears the banner.
    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::TickDispatched { .. })
    ));
    dash.next_event().await;
    assert!(dash.error().is_none());
    assert_eq!(h.backend.queries().len(), 2);
    assert_eq!(h.session.invalidations(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_query_text_suspends_and_restores_interval() {
    let mut h = harness(live(30));
    let dash = &mut h.dashboard;
    assert_eq!(dash.scheduler_state(), SchedulerState::Armed);

    dash.set_query_text("timeout");
    assert_eq!(dash.scheduler_state(), SchedulerState::Suspended);
    settle().await;
    tokio::time::advance(Duration::from_secs(120)).await;
    settle().await;
    assert!(dash.try_next_event().is_none());
    assert!(h.backend.queries().is_empty());

    dash.set_query_text("   ");
    assert_eq!(dash.scheduler_state(), SchedulerState::Armed);
    let state = dash.refresh_state();
    assert!(state.is_live);
    assert_eq!(state.interval, Duration::from_secs(30));

    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::TickDispatched { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_toggle_live_and_zero_interval() {
    let mut h = harness(DashboardOptions::default());
    let dash = &mut h.dashboard;
    assert_eq!(dash.scheduler_state(), SchedulerState::Stopped);

    dash.set_live(true);
    assert_eq!(dash.scheduler_state(), SchedulerState::Armed);

    dash.set_interval(Duration::ZERO);
    assert_eq!(dash.scheduler_state(), SchedulerState::Stopped);
    assert!(dash.refresh_state().is_live);

    dash.set_interval(Duration::from_secs(5));
    assert_eq!(dash.scheduler_state(), SchedulerState::Armed);
    dash.set_live(false);
    assert_eq!(dash.scheduler_state(), SchedulerState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_tick_from_replaced_timer_is_skipped() {
    let mut h = harness(live(10));
    let dash = &mut h.dashboard;

    // Restarting the timer bumps its generation past 1.
    dash.set_interval(Duration::from_secs(20));
    let event = dash.handle(Action::Tick { generation: 1 });
    assert!(matches!(event, DashboardEvent::TickSkipped));
    settle().await;
    assert!(h.backend.queries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_new_entries_notice_decays() {
    let mut h = harness(DashboardOptions::default());
    h.backend.push(Reply::ok(result_with(10, &[])));
    h.backend.push(Reply::ok(result_with(14, &[])));

    let dash = &mut h.dashboard;
    dash.search().unwrap();
    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::Applied {
            new_entries: None,
            ..
        })
    ));

    dash.refresh().unwrap();
    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::Applied {
            new_entries: Some(4),
            ..
        })
    ));
    assert_eq!(dash.refresh_state().new_since_last_notice, 4);

    settle().await;
    tokio::time::advance(Duration::from_secs(4)).await;
    settle().await;
    assert!(dash.try_next_event().is_none());
    assert_eq!(dash.refresh_state().new_since_last_notice, 4);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::NoticeCleared)
    ));
    assert_eq!(dash.refresh_state().new_since_last_notice, 0);
}

#[tokio::test(start_paused = true)]
async fn test_notice_disabled_without_notifications() {
    let mut h = harness(DashboardOptions {
        notifications: false,
        ..DashboardOptions::default()
    });
    h.backend.push(Reply::ok(result_with(10, &[])));
    h.backend.push(Reply::ok(result_with(14, &[])));

    let dash = &mut h.dashboard;
    dash.search().unwrap();
    dash.next_event().await;
    dash.refresh().unwrap();
    assert!(matches!(
        dash.next_event().await,
        Some(DashboardEvent::Applied {
            new_entries: None,
            total: 14,
            ..
        })
    ));
    assert_eq!(dash.refresh_state().new_since_last_notice, 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_timer_and_drops_in_flight_fetch() {
    let mut h = harness(live(10));
    h.backend
        .push(Reply::ok(result_with(1, &[])).after(Duration::from_secs(60)));

    let dash = &mut h.dashboard;
    dash.search().unwrap();
    settle().await;
    dash.shutdown().await;

    assert_eq!(dash.scheduler_state(), SchedulerState::Stopped);
    assert!(dash.try_next_event().is_none());
    assert_eq!(dash.total(), 0);
}
