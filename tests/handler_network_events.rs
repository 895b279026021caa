mod common;

use axum::{Router, routing::get};
use traffic_attribution::api::handlers::{clickback_handler, postback_handler};
use traffic_attribution::domain::entities::NetworkEventKind;

fn network_router() -> Router<traffic_attribution::AppState> {
    Router::new()
        .route("/postback", get(postback_handler))
        .route("/clickback", get(clickback_handler))
}

#[tokio::test]
async fn test_postback_recorded() {
    let ctx = common::create_test_context(100);
    let server = common::test_server(network_router(), ctx.state.clone());

    let response = server
        .get("/postback?click_id=abc&status=approved&payout=1.25&network=mgid&extra=1")
        .await;

    response.assert_status_ok();
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["id"], 1);

    let events = ctx.network_events.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.kind, NetworkEventKind::Postback);
    assert_eq!(event.click_id, "abc");
    assert_eq!(event.status.as_deref(), Some("approved"));
    assert_eq!(event.payout, Some(1.25));
    assert_eq!(event.network.as_deref(), Some("mgid"));
    assert_eq!(
        event.raw_query.as_deref(),
        Some("click_id=abc&status=approved&payout=1.25&network=mgid&extra=1")
    );
    assert_eq!(event.ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn test_clickback_recorded() {
    let ctx = common::create_test_context(100);
    let server = common::test_server(network_router(), ctx.state.clone());

    let response = server.get("/clickback?click_id=xyz").await;

    response.assert_status_ok();
    let events = ctx.network_events.events.lock().unwrap();
    assert_eq!(events[0].kind, NetworkEventKind::Clickback);
    assert_eq!(events[0].payout, None);
}

#[tokio::test]
async fn test_postback_missing_click_id() {
    let ctx = common::create_test_context(100);
    let server = common::test_server(network_router(), ctx.state.clone());

    let response = server.get("/postback?status=approved").await;

    response.assert_status_bad_request();
    assert!(ctx.network_events.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_postback_invalid_payout() {
    let ctx = common::create_test_context(100);
    let server = common::test_server(network_router(), ctx.state.clone());

    let response = server.get("/postback?click_id=abc&payout=lots").await;

    response.assert_status_bad_request();
    assert!(ctx.network_events.events.lock().unwrap().is_empty());
}
