// Matcher contract: locality preference, capacity awareness, deterministic
// tie-break.
use allocdesk::models::{RequestType, ResourceKind, UrgencyLevel};
use allocdesk::services::resource_matcher::ResourceMatcher;

mod helpers;
use helpers::*;

#[tokio::test]
async fn test_same_city_resource_preferred() {
    let db = setup_test_db().await;
    create_test_resource(&db, "RES-ANK", ResourceKind::SupportAgent, "Ankara", 2).await;
    create_test_resource(&db, "RES-IST", ResourceKind::TechTeam, "Istanbul", 2).await;

    let matcher = ResourceMatcher::new(db);
    let found = matcher
        .find_available("Istanbul")
        .await
        .expect("Lookup failed")
        .expect("Expected a resource");

    assert_eq!(found.resource.id, "RES-IST");
    assert_eq!(found.active_assignments, 0);
}

#[tokio::test]
async fn test_falls_back_to_any_city_when_local_capacity_exhausted() {
    let db = setup_test_db().await;
    let local = create_test_resource(&db, "RES-IST", ResourceKind::TechTeam, "Istanbul", 1).await;
    create_test_resource(&db, "RES-ANK", ResourceKind::SupportAgent, "Ankara", 1).await;

    // Fill the Istanbul resource.
    let requester = create_test_requester(&db, "Elif Aksoy", "Istanbul").await;
    let request = create_pending_request(
        &db,
        &requester,
        RequestType::ConnectionIssue,
        UrgencyLevel::High,
    )
    .await;
    create_test_assignment(&db, &request, &local, 50, 60_000).await;

    let matcher = ResourceMatcher::new(db);
    let found = matcher
        .find_available("Istanbul")
        .await
        .expect("Lookup failed")
        .expect("Expected a fallback resource");

    assert_eq!(found.resource.id, "RES-ANK");
}

#[tokio::test]
async fn test_returns_none_when_every_resource_is_full() {
    let db = setup_test_db().await;
    let only = create_test_resource(&db, "RES-IST", ResourceKind::TechTeam, "Istanbul", 1).await;

    let requester = create_test_requester(&db, "Elif Aksoy", "Istanbul").await;
    let request = create_pending_request(
        &db,
        &requester,
        RequestType::ConnectionIssue,
        UrgencyLevel::High,
    )
    .await;
    create_test_assignment(&db, &request, &only, 50, 60_000).await;

    let matcher = ResourceMatcher::new(db);
    let found = matcher.find_available("Istanbul").await.expect("Lookup failed");
    assert!(found.is_none());
}

#[tokio::test]
async fn test_lowest_id_wins_among_equal_candidates() {
    let db = setup_test_db().await;
    create_test_resource(&db, "RES-B", ResourceKind::TechTeam, "Istanbul", 2).await;
    create_test_resource(&db, "RES-A", ResourceKind::TechTeam, "Istanbul", 2).await;

    let matcher = ResourceMatcher::new(db);
    let found = matcher
        .find_available("Istanbul")
        .await
        .expect("Lookup failed")
        .expect("Expected a resource");

    assert_eq!(found.resource.id, "RES-A");
}

#[tokio::test]
async fn test_never_returns_resource_at_capacity() {
    let db = setup_test_db().await;
    let first = create_test_resource(&db, "RES-A", ResourceKind::TechTeam, "Istanbul", 1).await;
    create_test_resource(&db, "RES-B", ResourceKind::TechTeam, "Istanbul", 1).await;

    let requester = create_test_requester(&db, "Elif Aksoy", "Istanbul").await;
    let request = create_pending_request(
        &db,
        &requester,
        RequestType::ConnectionIssue,
        UrgencyLevel::High,
    )
    .await;
    create_test_assignment(&db, &request, &first, 50, 60_000).await;

    let matcher = ResourceMatcher::new(db);
    let found = matcher
        .find_available("Istanbul")
        .await
        .expect("Lookup failed")
        .expect("Expected the resource with spare capacity");

    // RES-A sorts first but is at capacity; RES-B must win.
    assert_eq!(found.resource.id, "RES-B");
    assert!(found.has_spare_capacity());
}

#[tokio::test]
async fn test_unknown_city_falls_back_to_global_search() {
    let db = setup_test_db().await;
    create_test_resource(&db, "RES-ANK", ResourceKind::SupportAgent, "Ankara", 1).await;

    let matcher = ResourceMatcher::new(db);
    let found = matcher
        .find_available("Bursa")
        .await
        .expect("Lookup failed")
        .expect("Expected the cross-city fallback");

    assert_eq!(found.resource.id, "RES-ANK");
}
