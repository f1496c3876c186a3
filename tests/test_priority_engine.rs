// Scoring contract: deterministic, rule-driven, degrades to zero weights.
use allocdesk::models::{
    PriorityRule, RequestType, RuleCategory, RuleSet, ServiceRequest, UrgencyLevel,
    WAITING_TIME_BONUS_KEY,
};
use allocdesk::services::priority_engine::score;
use chrono::{Duration, Utc};

fn default_rules() -> RuleSet {
    RuleSet::from_rules(vec![
        PriorityRule::weighted(RuleCategory::Urgency, "HIGH", 50),
        PriorityRule::weighted(RuleCategory::Urgency, "MEDIUM", 30),
        PriorityRule::weighted(RuleCategory::Urgency, "LOW", 10),
        PriorityRule::weighted(RuleCategory::Service, "CONNECTIVITY", 20),
        PriorityRule::weighted(RuleCategory::Service, "PAYMENTS", 10),
        PriorityRule::weighted(RuleCategory::Service, "STREAMING", 5),
        PriorityRule::weighted(RuleCategory::WaitingTime, WAITING_TIME_BONUS_KEY, 2),
    ])
}

fn request_submitted(
    request_type: RequestType,
    urgency: UrgencyLevel,
    seconds_ago: i64,
) -> ServiceRequest {
    let mut request = ServiceRequest::new("requester-1".to_string(), request_type, urgency);
    request.submitted_at = (Utc::now() - Duration::seconds(seconds_ago)).to_rfc3339();
    request
}

#[test]
fn test_connectivity_high_after_five_seconds_scores_80() {
    let rules = default_rules();
    let now = Utc::now();
    let mut request = ServiceRequest::new(
        "requester-1".to_string(),
        RequestType::ConnectionIssue,
        UrgencyLevel::High,
    );
    request.submitted_at = (now - Duration::seconds(5)).to_rfc3339();

    let result = score(&request, "Istanbul", &rules, now);

    // 50 urgency + 20 service + 0 request type + 5 * 2 waiting
    assert_eq!(result.total, 80);
    assert_eq!(result.breakdown["urgency"], 50);
    assert_eq!(result.breakdown["service"], 20);
    assert_eq!(result.breakdown["request_type"], 0);
    assert_eq!(result.breakdown["waiting_time"], 10);
    assert_eq!(result.breakdown["custom"], 0);
}

#[test]
fn test_score_never_decreases_while_waiting() {
    let rules = default_rules();
    let request = request_submitted(RequestType::PaymentProblem, UrgencyLevel::Medium, 0);

    let t1 = Utc::now() + Duration::seconds(10);
    let t2 = t1 + Duration::seconds(60);

    let earlier = score(&request, "Ankara", &rules, t1);
    let later = score(&request, "Ankara", &rules, t2);

    assert!(later.total >= earlier.total);
    assert_eq!(later.total - earlier.total, 60 * 2);
}

#[test]
fn test_high_urgency_outranks_medium_submitted_at_same_instant() {
    let rules = default_rules();
    let now = Utc::now();
    let mut high = ServiceRequest::new(
        "requester-1".to_string(),
        RequestType::StreamingIssue,
        UrgencyLevel::High,
    );
    let mut medium = ServiceRequest::new(
        "requester-2".to_string(),
        RequestType::StreamingIssue,
        UrgencyLevel::Medium,
    );
    high.submitted_at = now.to_rfc3339();
    medium.submitted_at = now.to_rfc3339();

    let high_score = score(&high, "Izmir", &rules, now);
    let medium_score = score(&medium, "Izmir", &rules, now);

    assert!(high_score.total >= medium_score.total);
    assert_eq!(high_score.total - medium_score.total, 20);
}

#[test]
fn test_custom_rule_applies_only_when_condition_matches() {
    let mut rules_vec = vec![PriorityRule::weighted(RuleCategory::Urgency, "LOW", 10)];
    rules_vec.push(PriorityRule::custom("requester_city == 'Istanbul'", 25));
    let rules = RuleSet::from_rules(rules_vec);
    let now = Utc::now();
    let request = request_submitted(RequestType::ConnectionIssue, UrgencyLevel::Low, 0);

    let istanbul = score(&request, "Istanbul", &rules, now);
    let ankara = score(&request, "Ankara", &rules, now);

    assert_eq!(istanbul.breakdown["custom"], 25);
    assert_eq!(ankara.breakdown["custom"], 0);
    assert_eq!(istanbul.total - ankara.total, 25);
}

#[test]
fn test_negative_weights_can_produce_negative_totals() {
    let rules = RuleSet::from_rules(vec![
        PriorityRule::weighted(RuleCategory::Urgency, "LOW", 10),
        PriorityRule::custom("service_category == 'STREAMING'", -100),
    ]);
    let now = Utc::now();
    let request = request_submitted(RequestType::StreamingIssue, UrgencyLevel::Low, 0);

    let result = score(&request, "Bursa", &rules, now);
    assert_eq!(result.total, -90);
}

#[test]
fn test_unparseable_custom_condition_contributes_nothing() {
    let rules = RuleSet::from_rules(vec![
        PriorityRule::weighted(RuleCategory::Urgency, "HIGH", 50),
        PriorityRule::custom("urgency_level === HIGH OR 1=1", 1000),
    ]);
    let now = Utc::now();
    let request = request_submitted(RequestType::ConnectionIssue, UrgencyLevel::High, 0);

    let result = score(&request, "Istanbul", &rules, now);
    assert_eq!(result.total, 50);
    assert_eq!(result.breakdown["custom"], 0);
}

#[test]
fn test_empty_rule_set_scores_zero() {
    let now = Utc::now();
    let request = request_submitted(RequestType::PaymentProblem, UrgencyLevel::High, 120);

    let result = score(&request, "Istanbul", &RuleSet::empty(), now);
    assert_eq!(result.total, 0);
    assert!(result.breakdown.values().all(|w| *w == 0));
}

#[test]
fn test_no_waiting_rule_means_no_waiting_bonus() {
    let rules = RuleSet::from_rules(vec![PriorityRule::weighted(
        RuleCategory::Urgency,
        "MEDIUM",
        30,
    )]);
    let now = Utc::now();
    let request = request_submitted(RequestType::ConnectionIssue, UrgencyLevel::Medium, 3600);

    let result = score(&request, "Istanbul", &rules, now);
    assert_eq!(result.total, 30);
    assert_eq!(result.breakdown["waiting_time"], 0);
}

#[test]
fn test_request_type_weight_is_applied() {
    let rules = RuleSet::from_rules(vec![PriorityRule::weighted(
        RuleCategory::RequestType,
        "SPEED_COMPLAINT",
        7,
    )]);
    let now = Utc::now();
    let request = request_submitted(RequestType::SpeedComplaint, UrgencyLevel::Low, 0);

    let result = score(&request, "Istanbul", &rules, now);
    assert_eq!(result.breakdown["request_type"], 7);
    assert_eq!(result.total, 7);
}

#[test]
fn test_scoring_is_deterministic_for_fixed_inputs() {
    let rules = default_rules();
    let now = Utc::now();
    let request = request_submitted(RequestType::ConnectionIssue, UrgencyLevel::High, 42);

    let first = score(&request, "Istanbul", &rules, now);
    let second = score(&request, "Istanbul", &rules, now);
    assert_eq!(first, second);
}
