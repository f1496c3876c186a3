use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule key for the waiting-time bonus weight. The bonus is granted per whole
/// second of waiting; the growth rate lives in the rule's weight so operators
/// can tune it without a deploy.
pub const WAITING_TIME_BONUS_KEY: &str = "BONUS_PER_SECOND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCategory {
    Urgency,
    Service,
    RequestType,
    WaitingTime,
    Custom,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Urgency => "URGENCY",
            RuleCategory::Service => "SERVICE",
            RuleCategory::RequestType => "REQUEST_TYPE",
            RuleCategory::WaitingTime => "WAITING_TIME",
            RuleCategory::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for RuleCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "URGENCY" => RuleCategory::Urgency,
            "SERVICE" => RuleCategory::Service,
            "REQUEST_TYPE" => RuleCategory::RequestType,
            "WAITING_TIME" => RuleCategory::WaitingTime,
            _ => RuleCategory::Custom,
        }
    }
}

/// A weighted scoring rule, editable by external collaborators at any time.
///
/// Weighted rules (`URGENCY`/`SERVICE`/`REQUEST_TYPE`/`WAITING_TIME`) match on
/// `key`; `CUSTOM` rules carry a boolean `condition` expression instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityRule {
    pub id: String,
    pub category: RuleCategory,
    pub key: Option<String>,
    pub condition: Option<String>,
    pub weight: i64,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl PriorityRule {
    pub fn weighted(category: RuleCategory, key: &str, weight: i64) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            key: Some(key.to_string()),
            condition: None,
            weight,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn custom(condition: &str, weight: i64) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            category: RuleCategory::Custom,
            key: None,
            condition: Some(condition.to_string()),
            weight,
            active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Immutable snapshot of the active rules, taken once per cycle.
///
/// Lookups never fail: a missing rule is a zero weight, which is also how an
/// unavailable rule store degrades.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<PriorityRule>,
}

impl RuleSet {
    pub fn from_rules(rules: Vec<PriorityRule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Weight of the first active rule matching (category, key), or 0.
    pub fn weight(&self, category: RuleCategory, key: &str) -> i64 {
        self.rules
            .iter()
            .find(|r| r.active && r.category == category && r.key.as_deref() == Some(key))
            .map(|r| r.weight)
            .unwrap_or(0)
    }

    /// Active CUSTOM rules that carry a condition expression.
    pub fn custom_rules(&self) -> impl Iterator<Item = &PriorityRule> {
        self.rules
            .iter()
            .filter(|r| r.active && r.category == RuleCategory::Custom && r.condition.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_lookup_matches_category_and_key() {
        let rules = RuleSet::from_rules(vec![
            PriorityRule::weighted(RuleCategory::Urgency, "HIGH", 50),
            PriorityRule::weighted(RuleCategory::Service, "CONNECTIVITY", 20),
        ]);

        assert_eq!(rules.weight(RuleCategory::Urgency, "HIGH"), 50);
        assert_eq!(rules.weight(RuleCategory::Service, "CONNECTIVITY"), 20);
        assert_eq!(rules.weight(RuleCategory::Urgency, "CONNECTIVITY"), 0);
        assert_eq!(rules.weight(RuleCategory::Urgency, "MEDIUM"), 0);
    }

    #[test]
    fn test_inactive_rules_are_ignored() {
        let mut rule = PriorityRule::weighted(RuleCategory::Urgency, "HIGH", 50);
        rule.active = false;
        let rules = RuleSet::from_rules(vec![rule]);

        assert_eq!(rules.weight(RuleCategory::Urgency, "HIGH"), 0);
    }

    #[test]
    fn test_custom_rules_iterator_skips_weighted_and_inactive() {
        let mut inactive = PriorityRule::custom("requester_city == 'Izmir'", 15);
        inactive.active = false;
        let rules = RuleSet::from_rules(vec![
            PriorityRule::weighted(RuleCategory::Urgency, "HIGH", 50),
            PriorityRule::custom("requester_city == 'Istanbul'", 25),
            inactive,
        ]);

        let customs: Vec<_> = rules.custom_rules().collect();
        assert_eq!(customs.len(), 1);
        assert_eq!(
            customs[0].condition.as_deref(),
            Some("requester_city == 'Istanbul'")
        );
    }

    #[test]
    fn test_empty_rule_set_degrades_to_zero() {
        let rules = RuleSet::empty();
        assert_eq!(rules.weight(RuleCategory::Urgency, "HIGH"), 0);
        assert_eq!(rules.weight(RuleCategory::WaitingTime, WAITING_TIME_BONUS_KEY), 0);
    }
}
