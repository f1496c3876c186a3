use crate::config::Config;
use crate::database::Database;
use crate::errors::DomainResult;
use crate::events::{EventBus, SystemEvent};
use crate::models::{RequestType, ServiceRequest, UrgencyLevel};
use crate::services::audit_log::AuditLogService;
use rand::Rng;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeederStatus {
    pub feeding: bool,
    pub total_requests: u64,
}

/// Synthetic traffic generator: a rate-limited producer of PENDING requests.
///
/// Stands in for the ingestion collaborator during demos. Urgency is skewed
/// towards MEDIUM (25% HIGH / 50% MEDIUM / 25% LOW) so the queue shows a mix
/// of priorities.
#[derive(Clone)]
pub struct RequestFeeder {
    inner: Arc<FeederInner>,
}

struct FeederInner {
    db: Database,
    event_bus: EventBus,
    audit: AuditLogService,
    config: Config,
    feeding: AtomicBool,
    total_requests: AtomicU64,
    handle: Mutex<Option<(watch::Sender<bool>, JoinHandle<()>)>>,
}

impl RequestFeeder {
    pub fn new(db: Database, event_bus: EventBus, config: Config) -> Self {
        Self {
            inner: Arc::new(FeederInner {
                audit: AuditLogService::new(db.clone()),
                db,
                event_bus,
                config,
                feeding: AtomicBool::new(false),
                total_requests: AtomicU64::new(0),
                handle: Mutex::new(None),
            }),
        }
    }

    pub async fn start(&self) -> DomainResult<()> {
        let mut handle = self.inner.handle.lock().await;
        if handle.is_some() {
            tracing::debug!("Request feeder already running, start ignored");
            return Ok(());
        }

        self.inner.total_requests.store(0, Ordering::Relaxed);
        self.inner.feeding.store(true, Ordering::Relaxed);

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_millis(inner.config.request_feed_ms));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = feed_one(&inner).await {
                            warn!("Failed to create synthetic request: {}", e);
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        *handle = Some((shutdown_tx, task));
        info!(
            "Request feeder started (interval: {}ms)",
            self.inner.config.request_feed_ms
        );
        Ok(())
    }

    pub async fn stop(&self) -> DomainResult<()> {
        let mut handle = self.inner.handle.lock().await;
        let Some((shutdown, task)) = handle.take() else {
            return Ok(());
        };

        let _ = shutdown.send(true);
        let _ = task.await;
        self.inner.feeding.store(false, Ordering::Relaxed);
        info!(
            "Request feeder stopped after {} requests",
            self.inner.total_requests.load(Ordering::Relaxed)
        );
        Ok(())
    }

    pub fn status(&self) -> FeederStatus {
        FeederStatus {
            feeding: self.inner.feeding.load(Ordering::Relaxed),
            total_requests: self.inner.total_requests.load(Ordering::Relaxed),
        }
    }
}

async fn feed_one(inner: &FeederInner) -> DomainResult<()> {
    let requesters = inner.db.list_requesters().await?;
    if requesters.is_empty() {
        warn!("No requesters available, skipping synthetic request");
        return Ok(());
    }

    let (requester_index, request_type, urgency) = {
        let mut rng = rand::thread_rng();
        let requester_index = rng.gen_range(0..requesters.len());
        let request_type = RequestType::ALL[rng.gen_range(0..RequestType::ALL.len())];
        let urgency = match rng.gen::<f64>() {
            roll if roll < 0.25 => UrgencyLevel::High,
            roll if roll < 0.75 => UrgencyLevel::Medium,
            _ => UrgencyLevel::Low,
        };
        (requester_index, request_type, urgency)
    };
    let requester = &requesters[requester_index];

    let request = ServiceRequest::new(requester.id.clone(), request_type, urgency);
    inner.db.create_request(&request).await?;

    let count = inner.total_requests.fetch_add(1, Ordering::Relaxed) + 1;
    info!(
        "[{}] New request: {} ({}) - {}/{} - {}",
        count,
        requester.name,
        requester.city,
        request.service_category,
        request.request_type,
        request.urgency_level
    );

    inner.audit.log_request_created(&request).await;
    inner
        .event_bus
        .publish(SystemEvent::RequestCreated(request));

    Ok(())
}
