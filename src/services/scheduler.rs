use crate::config::Config;
use crate::database::Database;
use crate::errors::DomainResult;
use crate::events::{EventBus, SystemEvent};
use crate::services::allocation::AllocationService;
use crate::services::audit_log::AuditLogService;
use crate::services::completion::CompletionService;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerStatus {
    pub running: bool,
    pub allocation_cycles: u64,
    pub completion_cycles: u64,
}

struct SchedulerHandles {
    shutdown: watch::Sender<bool>,
    allocation_task: JoinHandle<()>,
    completion_task: JoinHandle<()>,
}

/// Owns the two periodic cycles and their lifecycle.
///
/// `start` performs the demo reset (leftover transient state from a previous
/// run is dropped, resources return to AVAILABLE) and spawns the allocation
/// and completion tickers. A cycle that fails is logged and the ticker keeps
/// going; `stop` cancels the tickers and waits for in-flight cycles to
/// finish.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    db: Database,
    event_bus: EventBus,
    audit: AuditLogService,
    allocation: Arc<AllocationService>,
    completion: Arc<CompletionService>,
    config: Config,
    running: AtomicBool,
    allocation_cycles: AtomicU64,
    completion_cycles: AtomicU64,
    handles: Mutex<Option<SchedulerHandles>>,
}

impl Scheduler {
    pub fn new(db: Database, event_bus: EventBus, config: Config) -> Self {
        let allocation = Arc::new(AllocationService::new(
            db.clone(),
            event_bus.clone(),
            config.clone(),
        ));
        let completion = Arc::new(CompletionService::new(
            db.clone(),
            event_bus.clone(),
            allocation.clone(),
        ));

        Self {
            inner: Arc::new(SchedulerInner {
                audit: AuditLogService::new(db.clone()),
                db,
                event_bus,
                allocation,
                completion,
                config,
                running: AtomicBool::new(false),
                allocation_cycles: AtomicU64::new(0),
                completion_cycles: AtomicU64::new(0),
                handles: Mutex::new(None),
            }),
        }
    }

    pub async fn start(&self) -> DomainResult<()> {
        let mut handles = self.inner.handles.lock().await;
        if handles.is_some() {
            tracing::debug!("Scheduler already running, start ignored");
            return Ok(());
        }

        // Demo reset, not crash recovery: drop unfinished work from any
        // previous run and open with every resource AVAILABLE.
        let dropped_assignments = self.inner.db.clear_assignments().await?;
        let dropped_requests = self.inner.db.clear_transient_requests().await?;
        self.inner.db.reset_resources_available().await?;
        info!(
            "Scheduler starting (cleared {} assignments, {} unfinished requests)",
            dropped_assignments, dropped_requests
        );

        self.inner.allocation_cycles.store(0, Ordering::Relaxed);
        self.inner.completion_cycles.store(0, Ordering::Relaxed);

        self.inner.audit.log_scheduler_started().await;
        self.inner.event_bus.publish(SystemEvent::SchedulerStarted);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let allocation_task = {
            let inner = self.inner.clone();
            let mut shutdown = shutdown_rx.clone();
            tokio::spawn(async move {
                let mut ticker =
                    tokio::time::interval(Duration::from_millis(inner.config.allocation_tick_ms));
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            match inner.allocation.run_cycle().await {
                                Ok(_) => {
                                    inner.allocation_cycles.fetch_add(1, Ordering::Relaxed);
                                }
                                Err(e) => error!("Allocation cycle failed: {}", e),
                            }
                        }
                        _ = shutdown.changed() => break,
                    }
                }
            })
        };

        let completion_task = {
            let inner = self.inner.clone();
            let mut shutdown = shutdown_rx;
            tokio::spawn(async move {
                let mut ticker =
                    tokio::time::interval(Duration::from_millis(inner.config.completion_tick_ms));
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            match inner.completion.run_cycle().await {
                                Ok(_) => {
                                    inner.completion_cycles.fetch_add(1, Ordering::Relaxed);
                                }
                                Err(e) => error!("Completion cycle failed: {}", e),
                            }
                        }
                        _ = shutdown.changed() => break,
                    }
                }
            })
        };

        *handles = Some(SchedulerHandles {
            shutdown: shutdown_tx,
            allocation_task,
            completion_task,
        });
        self.inner.running.store(true, Ordering::Relaxed);

        Ok(())
    }

    /// Stop both tickers. An in-flight cycle finishes before its task exits;
    /// the atomic assign/complete transactions mean no partial state is
    /// possible either way.
    pub async fn stop(&self) -> DomainResult<()> {
        let mut handles = self.inner.handles.lock().await;
        let Some(handles) = handles.take() else {
            tracing::debug!("Scheduler not running, stop ignored");
            return Ok(());
        };

        let _ = handles.shutdown.send(true);
        let _ = handles.allocation_task.await;
        let _ = handles.completion_task.await;

        self.inner.running.store(false, Ordering::Relaxed);
        self.inner.audit.log_scheduler_stopped().await;
        self.inner.event_bus.publish(SystemEvent::SchedulerStopped);
        info!("Scheduler stopped");

        Ok(())
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            running: self.inner.running.load(Ordering::Relaxed),
            allocation_cycles: self.inner.allocation_cycles.load(Ordering::Relaxed),
            completion_cycles: self.inner.completion_cycles.load(Ordering::Relaxed),
        }
    }
}
