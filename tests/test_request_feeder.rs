// Synthetic traffic generator lifecycle and output shape.
use allocdesk::events::{EventBus, SystemEvent};
use allocdesk::models::{AuditEventType, RequestStatus};
use allocdesk::services::request_feeder::RequestFeeder;
use std::time::Duration;

mod helpers;
use helpers::*;

#[tokio::test]
async fn test_feeder_produces_pending_requests() {
    let db = setup_test_db().await;
    create_test_requester(&db, "Elif Aksoy", "Istanbul").await;
    create_test_requester(&db, "Murat Kaplan", "Ankara").await;

    let event_bus = EventBus::default();
    let mut events = event_bus.subscribe();
    let feeder = RequestFeeder::new(db.clone(), event_bus, fast_config());

    feeder.start().await.expect("Start failed");
    tokio::time::sleep(Duration::from_millis(200)).await;
    feeder.stop().await.expect("Stop failed");

    let status = feeder.status();
    assert!(!status.feeding);
    assert!(status.total_requests > 0);

    let pending = db
        .count_requests_with_status(RequestStatus::Pending)
        .await
        .unwrap();
    assert_eq!(pending, status.total_requests as i64);

    // Every produced request is audited and published.
    let audited = db
        .list_audit_entries(Some(AuditEventType::RequestCreated), None, 100, 0)
        .await
        .unwrap();
    assert_eq!(audited.len(), status.total_requests as usize);

    let mut published = 0;
    let mut last_requester_id = None;
    while let Ok(event) = events.try_recv() {
        if let SystemEvent::RequestCreated(request) = event {
            assert_eq!(request.status, RequestStatus::Pending);
            assert_eq!(request.service_category, request.request_type.category());
            last_requester_id = Some(request.requester_id);
            published += 1;
        }
    }
    assert_eq!(published, status.total_requests);

    // Requests always point at a seeded requester.
    let requester = db
        .get_requester_by_id(&last_requester_id.unwrap())
        .await
        .unwrap();
    assert!(requester.is_some());
}

#[tokio::test]
async fn test_feeder_without_requesters_produces_nothing() {
    let db = setup_test_db().await;
    let feeder = RequestFeeder::new(db.clone(), EventBus::default(), fast_config());

    feeder.start().await.expect("Start failed");
    tokio::time::sleep(Duration::from_millis(100)).await;
    feeder.stop().await.expect("Stop failed");

    assert_eq!(feeder.status().total_requests, 0);
    assert_eq!(
        db.count_requests_with_status(RequestStatus::Pending)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_feeder_start_is_idempotent_and_stop_is_safe() {
    let db = setup_test_db().await;
    create_test_requester(&db, "Elif Aksoy", "Istanbul").await;
    let feeder = RequestFeeder::new(db, EventBus::default(), fast_config());

    feeder.stop().await.expect("Stop before start failed");
    feeder.start().await.expect("Start failed");
    feeder.start().await.expect("Second start failed");
    feeder.stop().await.expect("Stop failed");
    assert!(!feeder.status().feeding);
}
