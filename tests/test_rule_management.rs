// Rule store contract: external mutation at any time, fresh snapshot per
// cycle.
use allocdesk::events::EventBus;
use allocdesk::models::{PriorityRule, RequestType, ResourceKind, RuleCategory, UrgencyLevel};
use allocdesk::services::allocation::AllocationService;

mod helpers;
use helpers::*;

#[tokio::test]
async fn test_weight_update_is_visible_on_next_snapshot() {
    let db = setup_test_db().await;
    let rule = PriorityRule::weighted(RuleCategory::Urgency, "HIGH", 50);
    db.create_rule(&rule).await.unwrap();

    let rules = db.load_active_rules().await.unwrap();
    assert_eq!(rules.weight(RuleCategory::Urgency, "HIGH"), 50);

    assert!(db.update_rule_weight(&rule.id, 80).await.unwrap());

    let rules = db.load_active_rules().await.unwrap();
    assert_eq!(rules.weight(RuleCategory::Urgency, "HIGH"), 80);
}

#[tokio::test]
async fn test_deactivated_rule_is_excluded_from_snapshot() {
    let db = setup_test_db().await;
    let rule = PriorityRule::weighted(RuleCategory::Service, "PAYMENTS", 10);
    db.create_rule(&rule).await.unwrap();

    assert!(db.set_rule_active(&rule.id, false).await.unwrap());

    let rules = db.load_active_rules().await.unwrap();
    assert_eq!(rules.weight(RuleCategory::Service, "PAYMENTS"), 0);

    // The rule still exists for the editing surface, just inactive.
    let all = db.list_rules().await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(!all[0].active);
}

#[tokio::test]
async fn test_deleted_rule_is_gone() {
    let db = setup_test_db().await;
    let rule = PriorityRule::custom("requester_city == 'Istanbul'", 25);
    db.create_rule(&rule).await.unwrap();

    assert!(db.delete_rule(&rule.id).await.unwrap());
    assert!(!db.delete_rule(&rule.id).await.unwrap());

    assert!(db.list_rules().await.unwrap().is_empty());
    assert_eq!(db.count_rules().await.unwrap(), 0);
}

#[tokio::test]
async fn test_allocation_cycle_reads_fresh_rules_every_pass() {
    let db = setup_test_db().await;
    let rule = PriorityRule::weighted(RuleCategory::Urgency, "LOW", 10);
    db.create_rule(&rule).await.unwrap();
    create_test_resource(&db, "RES-IST", ResourceKind::TechTeam, "Istanbul", 2).await;
    let requester = create_test_requester(&db, "Elif Aksoy", "Istanbul").await;

    let service = AllocationService::new(db.clone(), EventBus::default(), test_config());

    let first = create_pending_request(
        &db,
        &requester,
        RequestType::ConnectionIssue,
        UrgencyLevel::Low,
    )
    .await;
    service.run_cycle().await.expect("Cycle failed");

    // Rule edited between cycles; the next pass must score with the new
    // weight, not a cached snapshot.
    assert!(db.update_rule_weight(&rule.id, 44).await.unwrap());

    let second = create_pending_request(
        &db,
        &requester,
        RequestType::ConnectionIssue,
        UrgencyLevel::Low,
    )
    .await;
    service.run_cycle().await.expect("Cycle failed");

    let first_assignment = db
        .get_active_assignment_for_request(&first.id)
        .await
        .unwrap()
        .expect("First request should be assigned");
    let second_assignment = db
        .get_active_assignment_for_request(&second.id)
        .await
        .unwrap()
        .expect("Second request should be assigned");

    assert_eq!(first_assignment.priority_score, 10);
    assert_eq!(second_assignment.priority_score, 44);
}
