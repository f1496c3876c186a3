use crate::config::Config;
use crate::database::Database;
use crate::errors::DomainResult;
use crate::models::{
    PriorityRule, Requester, Resource, ResourceKind, RuleCategory, WAITING_TIME_BONUS_KEY,
};

impl Database {
    /// Seed the demo dataset: a handful of resources and requesters plus the
    /// default rule weights. Idempotent; a non-empty resource table means a
    /// seeded database and nothing is written.
    pub async fn seed_demo_data(&self, config: &Config) -> DomainResult<bool> {
        if self.count_resources().await? > 0 {
            return Ok(false);
        }

        let resources = [
            Resource::new(
                "RES-1".to_string(),
                ResourceKind::TechTeam,
                "Istanbul".to_string(),
                2,
            ),
            Resource::new(
                "RES-2".to_string(),
                ResourceKind::SupportAgent,
                "Ankara".to_string(),
                3,
            ),
            Resource::new(
                "RES-3".to_string(),
                ResourceKind::TechTeam,
                "Izmir".to_string(),
                1,
            ),
        ];
        for resource in &resources {
            self.create_resource(resource).await?;
        }

        let requesters = [
            Requester::new("Elif Aksoy".to_string(), "Istanbul".to_string()),
            Requester::new("Murat Kaplan".to_string(), "Ankara".to_string()),
            Requester::new("Selin Demirel".to_string(), "Izmir".to_string()),
            Requester::new("Kerem Avci".to_string(), "Bursa".to_string()),
        ];
        for requester in &requesters {
            self.create_requester(requester).await?;
        }

        if self.count_rules().await? == 0 {
            let rules = [
                PriorityRule::weighted(RuleCategory::Urgency, "HIGH", 50),
                PriorityRule::weighted(RuleCategory::Urgency, "MEDIUM", 30),
                PriorityRule::weighted(RuleCategory::Urgency, "LOW", 10),
                PriorityRule::weighted(RuleCategory::Service, "CONNECTIVITY", 20),
                PriorityRule::weighted(RuleCategory::Service, "PAYMENTS", 10),
                PriorityRule::weighted(RuleCategory::Service, "STREAMING", 5),
                PriorityRule::weighted(
                    RuleCategory::WaitingTime,
                    WAITING_TIME_BONUS_KEY,
                    config.waiting_bonus_per_second,
                ),
            ];
            for rule in &rules {
                self.create_rule(rule).await?;
            }
        }

        tracing::info!(
            "Seeded demo data: {} resources, {} requesters",
            resources.len(),
            requesters.len()
        );
        Ok(true)
    }
}
