use allocdesk::database::{AssignOutcome, Database};
use allocdesk::models::{
    Assignment, PriorityRule, Requester, RequestType, Resource, ResourceKind, RuleCategory,
    ServiceRequest, UrgencyLevel, WAITING_TIME_BONUS_KEY,
};
use chrono::{DateTime, Duration, Utc};

pub async fn create_test_requester(db: &Database, name: &str, city: &str) -> Requester {
    let requester = Requester::new(name.to_string(), city.to_string());
    db.create_requester(&requester)
        .await
        .expect("Failed to create requester");
    requester
}

pub async fn create_test_resource(
    db: &Database,
    id: &str,
    kind: ResourceKind,
    city: &str,
    capacity: i64,
) -> Resource {
    let resource = Resource::new(id.to_string(), kind, city.to_string(), capacity);
    db.create_resource(&resource)
        .await
        .expect("Failed to create resource");
    resource
}

pub async fn create_pending_request(
    db: &Database,
    requester: &Requester,
    request_type: RequestType,
    urgency: UrgencyLevel,
) -> ServiceRequest {
    let request = ServiceRequest::new(requester.id.clone(), request_type, urgency);
    db.create_request(&request)
        .await
        .expect("Failed to create request");
    request
}

/// Create a PENDING request with a controlled submission instant.
pub async fn create_request_submitted_at(
    db: &Database,
    requester: &Requester,
    request_type: RequestType,
    urgency: UrgencyLevel,
    submitted_at: DateTime<Utc>,
) -> ServiceRequest {
    let mut request = ServiceRequest::new(requester.id.clone(), request_type, urgency);
    request.submitted_at = submitted_at.to_rfc3339();
    db.create_request(&request)
        .await
        .expect("Failed to create request");
    request
}

/// Assign a request to a resource directly through the store, with a chosen
/// service duration (negative durations make the assignment immediately due).
pub async fn create_test_assignment(
    db: &Database,
    request: &ServiceRequest,
    resource: &Resource,
    priority_score: i64,
    duration_ms: i64,
) -> Assignment {
    let now = Utc::now();
    let assignment = Assignment::new(
        request.id.clone(),
        resource.id.clone(),
        priority_score,
        now,
        Duration::milliseconds(duration_ms),
    );
    let outcome = db
        .assign_request(&assignment, &now.to_rfc3339())
        .await
        .expect("Failed to assign request");
    assert!(
        matches!(&outcome, AssignOutcome::Assigned { .. }),
        "Fixture assignment was not created: {:?}",
        outcome
    );
    assignment
}

/// The default demo rule weights: HIGH=50 / MEDIUM=30 / LOW=10,
/// CONNECTIVITY=20 / PAYMENTS=10 / STREAMING=5, waiting bonus 2/sec.
pub async fn seed_default_rules(db: &Database) {
    seed_rules_without_waiting_bonus(db).await;
    db.create_rule(&PriorityRule::weighted(
        RuleCategory::WaitingTime,
        WAITING_TIME_BONUS_KEY,
        2,
    ))
    .await
    .expect("Failed to create rule");
}

/// Same weights minus the waiting bonus, for tests that need score ties.
pub async fn seed_rules_without_waiting_bonus(db: &Database) {
    let rules = [
        PriorityRule::weighted(RuleCategory::Urgency, "HIGH", 50),
        PriorityRule::weighted(RuleCategory::Urgency, "MEDIUM", 30),
        PriorityRule::weighted(RuleCategory::Urgency, "LOW", 10),
        PriorityRule::weighted(RuleCategory::Service, "CONNECTIVITY", 20),
        PriorityRule::weighted(RuleCategory::Service, "PAYMENTS", 10),
        PriorityRule::weighted(RuleCategory::Service, "STREAMING", 5),
    ];
    for rule in &rules {
        db.create_rule(rule).await.expect("Failed to create rule");
    }
}
