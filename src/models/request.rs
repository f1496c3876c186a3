use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceCategory {
    Connectivity,
    Payments,
    Streaming,
}

impl ServiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Connectivity => "CONNECTIVITY",
            ServiceCategory::Payments => "PAYMENTS",
            ServiceCategory::Streaming => "STREAMING",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for ServiceCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PAYMENTS" => ServiceCategory::Payments,
            "STREAMING" => ServiceCategory::Streaming,
            _ => ServiceCategory::Connectivity,
        }
    }
}

/// Sub-category of a request. Each type belongs to exactly one service
/// category, so ingestion only has to pick a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    ConnectionIssue,
    SpeedComplaint,
    PaymentProblem,
    StreamingIssue,
}

impl RequestType {
    pub const ALL: [RequestType; 4] = [
        RequestType::ConnectionIssue,
        RequestType::SpeedComplaint,
        RequestType::PaymentProblem,
        RequestType::StreamingIssue,
    ];

    pub fn category(&self) -> ServiceCategory {
        match self {
            RequestType::ConnectionIssue | RequestType::SpeedComplaint => {
                ServiceCategory::Connectivity
            }
            RequestType::PaymentProblem => ServiceCategory::Payments,
            RequestType::StreamingIssue => ServiceCategory::Streaming,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::ConnectionIssue => "CONNECTION_ISSUE",
            RequestType::SpeedComplaint => "SPEED_COMPLAINT",
            RequestType::PaymentProblem => "PAYMENT_PROBLEM",
            RequestType::StreamingIssue => "STREAMING_ISSUE",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for RequestType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SPEED_COMPLAINT" => RequestType::SpeedComplaint,
            "PAYMENT_PROBLEM" => RequestType::PaymentProblem,
            "STREAMING_ISSUE" => RequestType::StreamingIssue,
            _ => RequestType::ConnectionIssue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    High,
    Medium,
    Low,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::High => "HIGH",
            UrgencyLevel::Medium => "MEDIUM",
            UrgencyLevel::Low => "LOW",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for UrgencyLevel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "HIGH" => UrgencyLevel::High,
            "LOW" => UrgencyLevel::Low,
            _ => UrgencyLevel::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Assigned,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Assigned => "ASSIGNED",
            RequestStatus::Completed => "COMPLETED",
        }
    }

    /// Request lifecycle is strictly forward: PENDING -> ASSIGNED -> COMPLETED.
    pub fn can_transition_to(&self, to: RequestStatus) -> bool {
        matches!(
            (*self, to),
            (RequestStatus::Pending, RequestStatus::Assigned)
                | (RequestStatus::Assigned, RequestStatus::Completed)
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ASSIGNED" => RequestStatus::Assigned,
            "COMPLETED" => RequestStatus::Completed,
            _ => RequestStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: String,
    pub requester_id: String,
    pub service_category: ServiceCategory,
    pub request_type: RequestType,
    pub urgency_level: UrgencyLevel,
    pub status: RequestStatus,
    pub submitted_at: String,
    /// Set the first time an allocation pass found no resource; never cleared.
    pub queued_at: Option<String>,
    pub processed_at: Option<String>,
}

impl ServiceRequest {
    pub fn new(requester_id: String, request_type: RequestType, urgency: UrgencyLevel) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            requester_id,
            service_category: request_type.category(),
            request_type,
            urgency_level: urgency,
            status: RequestStatus::Pending,
            submitted_at: chrono::Utc::now().to_rfc3339(),
            queued_at: None,
            processed_at: None,
        }
    }

    pub fn submitted_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.submitted_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
