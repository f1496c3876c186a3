use crate::models::{RuleCategory, RuleSet, ServiceRequest, WAITING_TIME_BONUS_KEY};
use crate::services::condition_evaluator::evaluate_condition;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A computed priority with its per-term breakdown, as logged alongside
/// assignment decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityScore {
    pub total: i64,
    pub breakdown: BTreeMap<String, i64>,
}

/// Score a request against a rule snapshot at a fixed instant.
///
/// Deterministic and side-effect free: the same request, rules, and clock
/// always produce the same score. Weights may be negative, so totals may be
/// negative. A missing rule contributes 0, which is also how an empty
/// snapshot (rule store unavailable) degrades.
pub fn score(
    request: &ServiceRequest,
    requester_city: &str,
    rules: &RuleSet,
    now: DateTime<Utc>,
) -> PriorityScore {
    let urgency = rules.weight(RuleCategory::Urgency, request.urgency_level.as_str());
    let service = rules.weight(RuleCategory::Service, request.service_category.as_str());
    let request_type = rules.weight(RuleCategory::RequestType, request.request_type.as_str());

    let waiting_seconds = request
        .submitted_at_datetime()
        .map(|submitted| (now - submitted).num_seconds().max(0))
        .unwrap_or(0);
    let waiting =
        waiting_seconds * rules.weight(RuleCategory::WaitingTime, WAITING_TIME_BONUS_KEY);

    let custom: i64 = rules
        .custom_rules()
        .filter(|rule| {
            rule.condition
                .as_deref()
                .is_some_and(|c| evaluate_condition(c, request, requester_city))
        })
        .map(|rule| rule.weight)
        .sum();

    let total = urgency + service + request_type + waiting + custom;

    let mut breakdown = BTreeMap::new();
    breakdown.insert("urgency".to_string(), urgency);
    breakdown.insert("service".to_string(), service);
    breakdown.insert("request_type".to_string(), request_type);
    breakdown.insert("waiting_time".to_string(), waiting);
    breakdown.insert("custom".to_string(), custom);

    PriorityScore { total, breakdown }
}
