use crate::models::ServiceRequest;
use regex::Regex;
use std::sync::OnceLock;

// Grammar: field == 'literal'
fn condition_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\w+)\s*==\s*'([^']*)'\s*$").expect("condition pattern is valid")
    })
}

/// Evaluate a CUSTOM-rule condition against a request and its requester's
/// city.
///
/// Supported fields: `urgency_level`, `service_category`, `request_type`,
/// `requester_city`. Anything unparseable or unknown evaluates to false;
/// rule data is externally edited and must never be able to break a scoring
/// pass.
pub fn evaluate_condition(condition: &str, request: &ServiceRequest, requester_city: &str) -> bool {
    let Some(captures) = condition_pattern().captures(condition) else {
        return false;
    };

    let field = &captures[1];
    let literal = &captures[2];

    match field {
        "urgency_level" => request.urgency_level.as_str() == literal,
        "service_category" => request.service_category.as_str() == literal,
        "request_type" => request.request_type.as_str() == literal,
        "requester_city" => requester_city == literal,
        _ => false,
    }
}
