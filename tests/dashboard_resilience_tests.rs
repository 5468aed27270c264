//! Resiliency state machine and dashboard fallback behavior

use bizdash::client::{
    ApiClient, Dashboard, HealthProbe, MonitorConfig, ServerMonitor, ServerStatus,
};
use bizdash::generator::{RATING_POOL, REVIEW_POOL};
use bizdash::server::{build_router, ServerAppState};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn fast_config() -> MonitorConfig {
    MonitorConfig {
        grace_period: Duration::from_millis(10),
        recheck_interval: Duration::from_millis(20),
    }
}

/// Probe that returns the scripted results in order, repeating the last one
fn scripted_probe(results: Vec<bool>) -> (HealthProbe, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let probe: HealthProbe = Arc::new(move || {
        let i = counter.fetch_add(1, Ordering::SeqCst);
        let ok = results
            .get(i)
            .copied()
            .or_else(|| results.last().copied())
            .unwrap_or(false);
        Box::pin(async move { ok })
    });
    (probe, calls)
}

fn offline_dashboard() -> Dashboard {
    let (probe, _) = scripted_probe(vec![false]);
    let monitor = Arc::new(ServerMonitor::new(probe, fast_config()));
    // Nothing listens on this port; requests would fail fast anyway
    Dashboard::new(ApiClient::new("http://127.0.0.1:9"), monitor)
}

#[tokio::test]
async fn test_monitor_goes_online_on_successful_probe() {
    let (probe, _) = scripted_probe(vec![true]);
    let monitor = ServerMonitor::new(probe, fast_config());

    assert_eq!(monitor.status(), ServerStatus::Unknown);
    assert!(monitor.check().await);
    assert_eq!(monitor.status(), ServerStatus::Online);
    assert!(monitor.last_error().is_none());
    assert!(monitor.last_checked().is_some());
}

#[tokio::test]
async fn test_monitor_recovers_silently_after_grace_period() {
    let (probe, calls) = scripted_probe(vec![false, true]);
    let monitor = ServerMonitor::new(probe, fast_config());

    assert!(monitor.ensure_online().await);
    assert_eq!(monitor.status(), ServerStatus::Online);
    assert!(monitor.last_error().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_monitor_goes_offline_when_recovery_fails() {
    let (probe, _) = scripted_probe(vec![false, false]);
    let monitor = ServerMonitor::new(probe, fast_config());

    assert!(!monitor.ensure_online().await);
    assert_eq!(monitor.status(), ServerStatus::Offline);
    assert!(monitor.last_error().is_some());
}

#[tokio::test]
async fn test_manual_retry_clears_error() {
    let (probe, _) = scripted_probe(vec![false, false, true]);
    let monitor = ServerMonitor::new(probe, fast_config());

    assert!(!monitor.ensure_online().await);
    assert!(monitor.last_error().is_some());

    // Manual retry affordance
    assert!(monitor.check().await);
    assert_eq!(monitor.status(), ServerStatus::Online);
    assert!(monitor.last_error().is_none());
}

#[tokio::test]
async fn test_background_recheck_recovers_offline_monitor() {
    let (probe, _) = scripted_probe(vec![false, false, true]);
    let monitor = Arc::new(ServerMonitor::new(probe, fast_config()));

    assert!(!monitor.ensure_online().await);
    assert_eq!(monitor.status(), ServerStatus::Offline);

    let _recheck = ServerMonitor::start_recheck_task(&monitor);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(monitor.status(), ServerStatus::Online);
}

#[tokio::test]
async fn test_recheck_task_exits_when_monitor_dropped() {
    let (probe, calls) = scripted_probe(vec![false]);
    let monitor = Arc::new(ServerMonitor::new(probe, fast_config()));
    assert!(!monitor.check().await);

    let handle = ServerMonitor::start_recheck_task(&monitor);
    let probes_so_far = calls.load(Ordering::SeqCst);
    drop(monitor);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(handle.is_finished());
    assert_eq!(calls.load(Ordering::SeqCst), probes_so_far);
}

#[tokio::test]
async fn test_last_probe_wins_over_slow_stale_probe() {
    // First probe is slow and would report online; a newer probe reports
    // offline first. The stale result must not overwrite the newer one.
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let probe: HealthProbe = Arc::new(move || {
        let i = counter.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if i == 0 {
                tokio::time::sleep(Duration::from_millis(200)).await;
                true
            } else {
                false
            }
        })
    });
    let monitor = Arc::new(ServerMonitor::new(probe, fast_config()));

    let slow = monitor.clone();
    let first = tokio::spawn(async move { slow.check().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!monitor.check().await);
    first.await.expect("slow probe finished");

    assert_eq!(monitor.status(), ServerStatus::Offline);
}

#[tokio::test]
async fn test_validation_errors_block_network_traffic() {
    let (probe, calls) = scripted_probe(vec![true]);
    let monitor = Arc::new(ServerMonitor::new(probe, fast_config()));
    let dash = Dashboard::new(ApiClient::new("http://127.0.0.1:9"), monitor);

    let errors = dash.submit("", "Austin").await.expect_err("field error");
    assert!(errors.name.is_some());
    assert!(errors.location.is_none());

    let long = "x".repeat(101);
    let errors = dash.submit("Joe's Pizza", &long).await.expect_err("field error");
    assert!(errors.name.is_none());
    assert!(errors.location.is_some());

    // No probe, no request: validation failed before the network layer
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(dash.state().business_data.is_none());
}

#[tokio::test]
async fn test_offline_submit_falls_back_to_local_synthesis() {
    let dash = offline_dashboard();

    dash.submit("Joe's Pizza", "Austin").await.expect("accepted");

    let state = dash.state();
    assert!(!state.loading);
    assert!(state.error.is_none());

    let data = state.business_data.expect("fallback record");
    assert!(RATING_POOL.contains(&data.rating));
    assert!(REVIEW_POOL.contains(&data.reviews));
    assert!(data.headline.contains("Joe's Pizza"));
    assert!(data.headline.contains("Austin"));
    assert_eq!(data.name, "Joe's Pizza");
    assert_eq!(data.location, "Austin");

    // The connectivity banner is still available for the view layer
    assert!(dash.connection_error().is_some());
}

#[tokio::test]
async fn test_offline_regenerate_patches_only_headline() {
    let dash = offline_dashboard();
    dash.submit("Joe's Pizza", "Austin").await.expect("accepted");
    let before = dash.state().business_data.expect("record");

    dash.regenerate_headline().await;

    let after = dash.state().business_data.expect("record");
    assert_eq!(after.rating, before.rating);
    assert_eq!(after.reviews, before.reviews);
    assert_eq!(after.name, before.name);
    assert_eq!(after.location, before.location);
    assert!(after.headline.contains("Joe's Pizza"));
    assert!(!dash.state().headline_loading);
}

#[tokio::test]
async fn test_local_edits_are_clamped_and_reset_clears() {
    let dash = offline_dashboard();
    dash.submit("Joe's Pizza", "Austin").await.expect("accepted");

    dash.set_rating(9.9);
    assert_eq!(dash.state().business_data.unwrap().rating, 5.0);
    dash.set_rating(0.1);
    assert_eq!(dash.state().business_data.unwrap().rating, 1.0);
    dash.set_reviews(42);
    assert_eq!(dash.state().business_data.unwrap().reviews, 42);

    dash.reset();
    let state = dash.state();
    assert!(state.business_data.is_none());
    assert!(state.form_data.name.is_empty());
}

#[tokio::test]
async fn test_dashboard_uses_server_when_online() {
    let state = ServerAppState::new("development".to_string());
    let app = build_router(state, None);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let api = ApiClient::new(format!("http://{}", addr));
    let monitor = Arc::new(ServerMonitor::for_client(&api, fast_config()));
    let dash = Dashboard::new(api, monitor);

    dash.submit(" Joe's Pizza ", "Austin").await.expect("accepted");

    let state = dash.state();
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(dash.monitor().is_online());

    let data = state.business_data.expect("server record");
    assert_eq!(data.name, "Joe's Pizza");
    assert!(RATING_POOL.contains(&data.rating));

    dash.regenerate_headline().await;
    let after = dash.state().business_data.expect("record");
    assert_eq!(after.rating, data.rating);
    assert!(after.headline.contains("Austin"));
}

#[tokio::test]
async fn test_newer_submission_supersedes_stale_one() {
    use axum::{routing::post, Json, Router};

    // Stub service: the first request is slow, the second immediate. The
    // slow (stale) response must not overwrite the newer one.
    let calls = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
        "/business-data",
        post(move |Json(body): Json<Value>| {
            let calls = calls.clone();
            async move {
                let i = calls.fetch_add(1, Ordering::SeqCst);
                let headline = if i == 0 {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    "SLOW"
                } else {
                    "FAST"
                };
                Json(json!({
                    "name": body["name"],
                    "location": body["location"],
                    "rating": 4.5,
                    "reviews": 156,
                    "headline": headline,
                    "timestamp": "2025-01-01T00:00:00Z",
                    "success": true,
                }))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let (probe, _) = scripted_probe(vec![true]);
    let monitor = Arc::new(ServerMonitor::new(probe, fast_config()));
    let dash = Arc::new(Dashboard::new(
        ApiClient::new(format!("http://{}", addr)),
        monitor,
    ));

    let stale = dash.clone();
    let first = tokio::spawn(async move { stale.submit("Joe's Pizza", "Austin").await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    dash.submit("Joe's Pizza", "Austin").await.expect("accepted");
    first.await.expect("join").expect("accepted");

    let state = dash.state();
    assert_eq!(state.business_data.expect("record").headline, "FAST");
    assert!(!state.loading);
}
