use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Assigned,
    Completed,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "ASSIGNED",
            AssignmentStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for AssignmentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "COMPLETED" => AssignmentStatus::Completed,
            _ => AssignmentStatus::Assigned,
        }
    }
}

/// The in-progress (or finished) service of one request by one resource.
///
/// `priority_score` is the score the request held when it was assigned and is
/// never recomputed. Assignments are created together with the request's
/// PENDING -> ASSIGNED transition and mutated exactly once, to COMPLETED.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub request_id: String,
    pub resource_id: String,
    pub priority_score: i64,
    pub status: AssignmentStatus,
    pub assigned_at: String,
    pub expected_completion_at: String,
    pub completed_at: Option<String>,
}

impl Assignment {
    pub fn new(
        request_id: String,
        resource_id: String,
        priority_score: i64,
        assigned_at: DateTime<Utc>,
        service_duration: Duration,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            request_id,
            resource_id,
            priority_score,
            status: AssignmentStatus::Assigned,
            assigned_at: assigned_at.to_rfc3339(),
            expected_completion_at: (assigned_at + service_duration).to_rfc3339(),
            completed_at: None,
        }
    }

    pub fn assigned_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.assigned_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn expected_completion_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.expected_completion_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn completed_at_datetime(&self) -> Option<DateTime<Utc>> {
        self.completed_at
            .as_ref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_completion_offset_from_assigned_at() {
        let now = Utc::now();
        let assignment = Assignment::new(
            "req-1".to_string(),
            "res-1".to_string(),
            80,
            now,
            Duration::milliseconds(12_000),
        );

        let assigned = assignment.assigned_at_datetime().unwrap();
        let expected = assignment.expected_completion_datetime().unwrap();
        assert_eq!((expected - assigned).num_milliseconds(), 12_000);
        assert_eq!(assignment.status, AssignmentStatus::Assigned);
        assert!(assignment.completed_at.is_none());
    }
}
