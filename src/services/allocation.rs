use crate::config::Config;
use crate::database::{AssignOutcome, Database};
use crate::errors::{DomainError, DomainResult};
use crate::events::{EventBus, SystemEvent};
use crate::models::{Assignment, Requester, RuleSet, ServiceRequest};
use crate::services::audit_log::AuditLogService;
use crate::services::notification::NotificationService;
use crate::services::priority_engine::{self, PriorityScore};
use crate::services::resource_matcher::ResourceMatcher;
use chrono::{Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Counters for one allocation pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllocationOutcome {
    pub scanned: usize,
    pub assigned: usize,
    pub queued: usize,
}

/// One pass of request-to-resource matching in priority order.
///
/// The periodic allocation cycle and the completion-triggered backfill pass
/// both run through here and serialize on `pass_lock`, so two passes can
/// never race over the same PENDING snapshot.
pub struct AllocationService {
    db: Database,
    event_bus: EventBus,
    audit: AuditLogService,
    notifications: NotificationService,
    matcher: ResourceMatcher,
    config: Config,
    pass_lock: Mutex<()>,
}

impl AllocationService {
    pub fn new(db: Database, event_bus: EventBus, config: Config) -> Self {
        Self {
            audit: AuditLogService::new(db.clone()),
            notifications: NotificationService::new(db.clone()),
            matcher: ResourceMatcher::new(db.clone()),
            db,
            event_bus,
            config,
            pass_lock: Mutex::new(()),
        }
    }

    /// Run one allocation tick over every PENDING request.
    pub async fn run_cycle(&self) -> DomainResult<AllocationOutcome> {
        let _pass = self.pass_lock.lock().await;

        let pending = self.db.list_pending_requests().await?;
        if pending.is_empty() {
            return Ok(AllocationOutcome::default());
        }

        let outcome = self.allocate_ranked(pending, false).await?;

        // One coalesced signal per cycle, not one per request.
        self.event_bus.publish(SystemEvent::DashboardRefresh);

        tracing::debug!(
            "Allocation cycle: {} scanned, {} assigned, {} queued",
            outcome.scanned,
            outcome.assigned,
            outcome.queued
        );
        Ok(outcome)
    }

    /// Drain freed capacity into already-queued requests, highest priority
    /// first, stopping at the first request that finds no resource.
    pub async fn backfill_queued(&self) -> DomainResult<AllocationOutcome> {
        let _pass = self.pass_lock.lock().await;

        let queued = self.db.list_queued_pending_requests().await?;
        if queued.is_empty() {
            return Ok(AllocationOutcome::default());
        }

        let outcome = self.allocate_ranked(queued, true).await?;
        tracing::debug!(
            "Backfill pass: {} scanned, {} assigned",
            outcome.scanned,
            outcome.assigned
        );
        Ok(outcome)
    }

    /// Score, rank, and allocate a snapshot of requests.
    ///
    /// Rules and scores are taken once, at the instant of the snapshot. Sort
    /// order is score descending with ascending submission time as the
    /// deterministic tie-break.
    async fn allocate_ranked(
        &self,
        requests: Vec<ServiceRequest>,
        stop_on_first_miss: bool,
    ) -> DomainResult<AllocationOutcome> {
        let requesters = self.requester_index().await?;
        let rules = self.load_rules_or_empty().await;
        if rules.is_empty() {
            tracing::debug!("Active rule set is empty, all scores are zero");
        }
        let now = Utc::now();

        let mut ranked: Vec<(ServiceRequest, PriorityScore)> = requests
            .into_iter()
            .map(|request| {
                let city = requesters
                    .get(&request.requester_id)
                    .map(|r| r.city.as_str())
                    .unwrap_or("");
                let score = priority_engine::score(&request, city, &rules, now);
                (request, score)
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.1.total
                .cmp(&a.1.total)
                .then_with(|| a.0.submitted_at.cmp(&b.0.submitted_at))
        });

        let mut outcome = AllocationOutcome::default();
        for (request, score) in &ranked {
            outcome.scanned += 1;
            let requester = requesters.get(&request.requester_id);
            if self.try_allocate(request, requester, score.total).await? {
                outcome.assigned += 1;
            } else {
                outcome.queued += 1;
                if stop_on_first_miss {
                    break;
                }
            }
        }
        Ok(outcome)
    }

    /// Attempt to assign one request. Returns true when an assignment was
    /// created, false when no capacity was found (the request stays PENDING).
    async fn try_allocate(
        &self,
        request: &ServiceRequest,
        requester: Option<&Requester>,
        score: i64,
    ) -> DomainResult<bool> {
        let city = requester.map(|r| r.city.as_str()).unwrap_or("");

        let Some(candidate) = self.matcher.find_available(city).await? else {
            self.queue_request(request, score).await?;
            return Ok(false);
        };

        let now = Utc::now();
        let duration_ms = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.config.min_completion_ms..=self.config.max_completion_ms)
        };
        let assignment = Assignment::new(
            request.id.clone(),
            candidate.resource.id.clone(),
            score,
            now,
            Duration::milliseconds(duration_ms as i64),
        );

        match self.db.assign_request(&assignment, &now.to_rfc3339()).await? {
            AssignOutcome::Assigned {
                resource,
                became_busy,
            } => {
                tracing::info!(
                    "Assigned request {} to resource {} (score {})",
                    request.id,
                    resource.id,
                    score
                );
                self.audit.log_assignment_created(&assignment).await;
                if became_busy {
                    self.audit.log_resource_busy(&resource).await;
                    self.event_bus
                        .publish(SystemEvent::ResourceStatusChanged(resource.clone()));
                }
                self.event_bus
                    .publish(SystemEvent::AssignmentCreated(assignment.clone()));

                if let Some(requester) = requester {
                    self.notifications
                        .notify_assignment(
                            &request.requester_id,
                            &requester.name,
                            request.service_category,
                            request.request_type,
                        )
                        .await;
                }
                Ok(true)
            }
            AssignOutcome::ResourceFull => {
                // Capacity raced away between match and write; same outcome
                // as finding no resource at all.
                self.queue_request(request, score).await?;
                Ok(false)
            }
            AssignOutcome::RequestUnavailable => Err(DomainError::Conflict(format!(
                "Request {} left PENDING mid-pass",
                request.id
            ))),
        }
    }

    async fn queue_request(&self, request: &ServiceRequest, score: i64) -> DomainResult<()> {
        let now = Utc::now().to_rfc3339();
        // queued_at is stamped once; later failed attempts are not re-logged.
        if self.db.mark_request_queued(&request.id, &now).await? {
            tracing::debug!("Request {} queued, no available resource", request.id);
            self.audit
                .log_request_queued(&request.id, score, "no available resource")
                .await;
        }
        Ok(())
    }

    async fn requester_index(&self) -> DomainResult<HashMap<String, Requester>> {
        let requesters = self.db.list_requesters().await?;
        Ok(requesters
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect())
    }

    async fn load_rules_or_empty(&self) -> RuleSet {
        match self.db.load_active_rules().await {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!("Rule set unavailable, scoring with zero weights: {}", e);
                RuleSet::empty()
            }
        }
    }
}
