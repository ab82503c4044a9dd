//! CRM sync worker
//!
//! Per-lead state machine: `Pending -> InFlight -> Delivered`, or back to
//! `Pending` on failure. A lead is only removed from the store after the CRM
//! confirmed it, and it is always written to the store before the first
//! attempt.

use super::{DeliveryOutcome, RetryPolicy, SubmissionStatus, SweepReport, SyncError, SyncStats};
use crate::config::SyncConfig;
use crate::crm::CrmClient;
use crate::lead::{LeadId, LeadRecord};
use crate::store::{EntryState, PendingLeadStore};
use crate::telemetry::{increment, record_latency, set_gauge, CounterMetric, GaugeMetric, LatencyMetric};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;

/// Worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Attempt delivery immediately after saving
    pub fast_path: bool,
    /// Delay between sweeps
    pub sweep_interval: Duration,
    /// When to stop retrying a lead
    pub policy: RetryPolicy,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::from(&SyncConfig::default())
    }
}

impl From<&SyncConfig> for WorkerConfig {
    fn from(config: &SyncConfig) -> Self {
        Self {
            fast_path: config.fast_path,
            sweep_interval: config.sweep_interval(),
            policy: RetryPolicy::from_config(config),
        }
    }
}

/// Delivers pending leads to the CRM with retry
pub struct CrmSyncWorker {
    store: Arc<dyn PendingLeadStore>,
    client: Arc<dyn CrmClient>,
    config: WorkerConfig,
    in_flight: Mutex<HashSet<LeadId>>,
    sweep_lock: Mutex<()>,
    started: AtomicBool,
    stats: Arc<RwLock<SyncStats>>,
}

impl CrmSyncWorker {
    /// Create a new worker
    pub fn new(
        store: Arc<dyn PendingLeadStore>,
        client: Arc<dyn CrmClient>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            store,
            client,
            config,
            in_flight: Mutex::new(HashSet::new()),
            sweep_lock: Mutex::new(()),
            started: AtomicBool::new(false),
            stats: Arc::new(RwLock::new(SyncStats::default())),
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Store a freshly collected lead, then try the fast path
    ///
    /// Delivery is never attempted for a lead that could not be stored.
    pub async fn submit(&self, lead: LeadRecord) -> SubmissionStatus {
        self.stats.write().await.submitted += 1;
        increment(CounterMetric::LeadSubmitted);

        if let Err(e) = self.store.save(&lead).await {
            tracing::warn!(lead_id = %lead.id(), error = %e, "Failed to store lead");
            self.storage_error().await;
            return SubmissionStatus::StorageFailed;
        }

        if !self.config.fast_path {
            tracing::debug!(lead_id = %lead.id(), "Lead queued for next sweep");
            return SubmissionStatus::Queued;
        }

        match self.deliver_one(&lead).await {
            DeliveryOutcome::Delivered => SubmissionStatus::Delivered,
            DeliveryOutcome::Retrying { .. } => SubmissionStatus::FailedWillRetry,
            DeliveryOutcome::GivenUp(_) => SubmissionStatus::GivenUp,
            // A sweep picked it up between save and attempt
            DeliveryOutcome::InFlight => SubmissionStatus::Queued,
            // A sweep finished it before the fast path got its turn
            DeliveryOutcome::Settled { given_up: true } => SubmissionStatus::GivenUp,
            DeliveryOutcome::Settled { given_up: false } => SubmissionStatus::Delivered,
        }
    }

    /// Run one pass over every pending lead
    ///
    /// Returns immediately with an `overlapped` report when another sweep
    /// is still running.
    pub async fn sweep(&self) -> SweepReport {
        let Ok(_guard) = self.sweep_lock.try_lock() else {
            tracing::debug!("Sweep already running, skipping");
            return SweepReport::overlapped();
        };

        let started = Instant::now();
        let mut report = SweepReport::default();

        let pending = match self.store.list_pending().await {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list pending leads");
                self.storage_error().await;
                report.store_error = Some(e.to_string());
                return report;
            }
        };

        for lead in &pending {
            let outcome = self.deliver_one(lead).await;
            report.record(&outcome);
        }

        match self.store.list_pending().await {
            Ok(remaining) => {
                report.pending_after = remaining.len();
                set_gauge(GaugeMetric::PendingLeads, remaining.len() as f64);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to count pending leads after sweep");
                self.storage_error().await;
            }
        }

        self.stats.write().await.sweeps += 1;
        increment(CounterMetric::SweepRun);
        record_latency(LatencyMetric::Sweep, started.elapsed());

        if report.attempted > 0 {
            tracing::info!(
                attempted = report.attempted,
                delivered = report.delivered,
                retrying = report.retrying,
                given_up = report.given_up,
                pending = report.pending_after,
                "Sweep complete"
            );
        }

        report
    }

    /// Start the periodic sweep
    ///
    /// Only the first call succeeds; later calls fail with
    /// [`SyncError::AlreadyStarted`], even after the loop was shut down.
    pub fn start(self: &Arc<Self>) -> Result<SweepHandle, SyncError> {
        if self
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SyncError::AlreadyStarted);
        }

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let worker = Arc::clone(self);
        let interval = self.config.sweep_interval;

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            tracing::info!(interval_secs = interval.as_secs_f64(), "Sweep loop started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        worker.sweep().await;
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Sweep loop shutting down");
                        break;
                    }
                }
            }
        });

        Ok(SweepHandle {
            shutdown: Some(shutdown_tx),
            join,
        })
    }

    /// Whether `start` has been called
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Get current statistics
    pub async fn stats(&self) -> SyncStats {
        self.stats.read().await.clone()
    }

    /// Attempt one lead unless another attempt for it is running or it is
    /// no longer pending
    ///
    /// The store is re-read after claiming the in-flight slot: a sweep works
    /// from a snapshot, and the fast path or `clear` may have settled the
    /// lead since then.
    async fn deliver_one(&self, lead: &LeadRecord) -> DeliveryOutcome {
        if !self.in_flight.lock().await.insert(lead.id()) {
            tracing::debug!(lead_id = %lead.id(), "Lead already in flight");
            return DeliveryOutcome::InFlight;
        }

        let outcome = match self.store.get(lead.id()).await {
            Ok(Some(entry)) if entry.state == EntryState::Pending => {
                self.attempt(&entry.lead).await
            }
            Ok(Some(_)) => {
                tracing::debug!(lead_id = %lead.id(), "Lead was given up, skipping");
                DeliveryOutcome::Settled { given_up: true }
            }
            Ok(None) => {
                tracing::debug!(lead_id = %lead.id(), "Lead no longer stored, skipping");
                DeliveryOutcome::Settled { given_up: false }
            }
            Err(e) => {
                // The CRM dedups by email, so a duplicate attempt is tolerated
                tracing::warn!(lead_id = %lead.id(), error = %e, "Failed to re-read lead, attempting anyway");
                self.storage_error().await;
                self.attempt(lead).await
            }
        };

        self.in_flight.lock().await.remove(&lead.id());
        outcome
    }

    async fn attempt(&self, lead: &LeadRecord) -> DeliveryOutcome {
        let started = Instant::now();
        let result = self.client.deliver(lead).await;
        record_latency(LatencyMetric::CrmDelivery, started.elapsed());

        match result {
            Ok(()) => {
                if let Err(e) = self.store.remove(lead.id()).await {
                    // The CRM dedups by email, so a later redelivery is harmless
                    tracing::warn!(lead_id = %lead.id(), error = %e, "Delivered lead could not be removed");
                    self.storage_error().await;
                }
                self.stats.write().await.delivered += 1;
                increment(CounterMetric::LeadDelivered);
                tracing::info!(
                    lead_id = %lead.id(),
                    form = lead.form_id(),
                    attempts = lead.attempt_count() + 1,
                    "Lead delivered to CRM"
                );
                DeliveryOutcome::Delivered
            }
            Err(e) => {
                self.stats.write().await.failed_attempts += 1;
                increment(CounterMetric::DeliveryFailed);

                let updated = match self.store.record_failure(lead.id(), &e.to_string()).await {
                    Ok(Some(updated)) => updated,
                    Ok(None) => Self::next_attempt(lead),
                    Err(store_err) => {
                        tracing::warn!(lead_id = %lead.id(), error = %store_err, "Failed to record delivery failure");
                        self.storage_error().await;
                        Self::next_attempt(lead)
                    }
                };

                tracing::warn!(
                    lead_id = %lead.id(),
                    attempt = updated.attempt_count(),
                    error = %e,
                    "CRM delivery failed"
                );

                match self.config.policy.exhausted(&updated, Utc::now()) {
                    Some(reason) => {
                        if let Err(store_err) =
                            self.store.mark_given_up(lead.id(), &reason.to_string()).await
                        {
                            tracing::warn!(lead_id = %lead.id(), error = %store_err, "Failed to mark lead as given up");
                            self.storage_error().await;
                        }
                        self.stats.write().await.given_up += 1;
                        increment(CounterMetric::LeadGivenUp);
                        tracing::error!(
                            lead_id = %lead.id(),
                            email = lead.email(),
                            %reason,
                            "Giving up on lead; kept in store for manual follow-up"
                        );
                        DeliveryOutcome::GivenUp(reason)
                    }
                    None => DeliveryOutcome::Retrying {
                        attempts: updated.attempt_count(),
                    },
                }
            }
        }
    }

    fn next_attempt(lead: &LeadRecord) -> LeadRecord {
        let mut next = lead.clone();
        next.record_attempt();
        next
    }

    async fn storage_error(&self) {
        self.stats.write().await.storage_errors += 1;
        increment(CounterMetric::StorageError);
    }
}

/// Handle to the running sweep loop
pub struct SweepHandle {
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl SweepHandle {
    /// Stop the loop, letting a running sweep finish first
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.join).await {
            tracing::error!(error = %e, "Sweep loop task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crm::DeliveryError;
    use crate::lead::fixtures::lead;
    use crate::store::{MemoryStore, StoreError, StoredLead};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};

    /// Client whose answers are scripted per email; unscripted calls succeed
    #[derive(Default)]
    struct ScriptedClient {
        script: Mutex<HashMap<String, VecDeque<bool>>>,
        calls: Mutex<Vec<LeadId>>,
        delay: Duration,
        delays: HashMap<String, Duration>,
        store: Option<MemoryStore>,
        seen_in_store: Mutex<Vec<bool>>,
    }

    impl ScriptedClient {
        fn failing_first(email: &str, failures: usize) -> Self {
            let mut script = HashMap::new();
            script.insert(email.to_string(), vec![false; failures].into());
            Self {
                script: Mutex::new(script),
                ..Default::default()
            }
        }

        fn always_failing(email: &str) -> Self {
            Self::failing_first(email, 10_000)
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay,
                ..Default::default()
            }
        }

        async fn calls(&self) -> Vec<LeadId> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl CrmClient for ScriptedClient {
        async fn deliver(&self, lead: &LeadRecord) -> Result<(), DeliveryError> {
            if let Some(ref store) = self.store {
                let present = store
                    .list_pending()
                    .await
                    .unwrap()
                    .iter()
                    .any(|l| l.id() == lead.id());
                self.seen_in_store.lock().await.push(present);
            }

            self.calls.lock().await.push(lead.id());
            let delay = self.delays.get(lead.email()).copied().unwrap_or(self.delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let ok = self
                .script
                .lock()
                .await
                .get_mut(lead.email())
                .and_then(|answers| answers.pop_front())
                .unwrap_or(true);

            if ok {
                Ok(())
            } else {
                Err(DeliveryError::Rejected {
                    status: 503,
                    body: "unavailable".to_string(),
                })
            }
        }
    }

    /// Store that refuses every write
    struct BrokenStore;

    #[async_trait]
    impl PendingLeadStore for BrokenStore {
        async fn save(&self, _lead: &LeadRecord) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
        async fn get(&self, _id: LeadId) -> Result<Option<StoredLead>, StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
        async fn list_pending(&self) -> Result<Vec<LeadRecord>, StoreError> {
            Err(StoreError::Unavailable("quota exceeded".to_string()))
        }
        async fn remove(&self, _id: LeadId) -> Result<(), StoreError> {
            Ok(())
        }
        async fn record_failure(
            &self,
            _id: LeadId,
            _error: &str,
        ) -> Result<Option<LeadRecord>, StoreError> {
            Ok(None)
        }
        async fn mark_given_up(&self, _id: LeadId, _reason: &str) -> Result<(), StoreError> {
            Ok(())
        }
        async fn requeue(&self, id: LeadId) -> Result<(), StoreError> {
            Err(StoreError::NotFound(id))
        }
        async fn entries(&self) -> Result<Vec<StoredLead>, StoreError> {
            Ok(vec![])
        }
    }

    fn config(policy: RetryPolicy) -> WorkerConfig {
        WorkerConfig {
            fast_path: true,
            sweep_interval: Duration::from_millis(20),
            policy,
        }
    }

    fn worker(
        store: &MemoryStore,
        client: Arc<ScriptedClient>,
        policy: RetryPolicy,
    ) -> Arc<CrmSyncWorker> {
        Arc::new(CrmSyncWorker::new(
            Arc::new(store.clone()),
            client,
            config(policy),
        ))
    }

    #[tokio::test]
    async fn test_fast_path_delivers_and_removes() {
        let store = MemoryStore::new();
        let client = Arc::new(ScriptedClient::default());
        let worker = worker(&store, client.clone(), RetryPolicy::unlimited());

        let status = worker.submit(lead("ana@example.com")).await;

        assert_eq!(status, SubmissionStatus::Delivered);
        assert!(store.is_empty().await);
        assert_eq!(client.calls().await.len(), 1);
        assert_eq!(worker.stats().await.delivered, 1);
    }

    #[tokio::test]
    async fn test_stored_before_first_attempt() {
        let store = MemoryStore::new();
        let client = Arc::new(ScriptedClient {
            store: Some(store.clone()),
            ..Default::default()
        });
        let worker = worker(&store, client.clone(), RetryPolicy::unlimited());

        worker.submit(lead("ana@example.com")).await;

        assert_eq!(*client.seen_in_store.lock().await, vec![true]);
    }

    #[tokio::test]
    async fn test_failure_keeps_lead_pending() {
        let store = MemoryStore::new();
        let client = Arc::new(ScriptedClient::always_failing("ana@example.com"));
        let worker = worker(&store, client, RetryPolicy::unlimited());
        let lead = lead("ana@example.com");
        let id = lead.id();

        let status = worker.submit(lead).await;
        assert_eq!(status, SubmissionStatus::FailedWillRetry);

        for _ in 0..3 {
            let report = worker.sweep().await;
            assert_eq!(report.retrying, 1);
        }

        let pending = store.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id(), id);
        assert_eq!(pending[0].attempt_count(), 4);
        assert_eq!(worker.stats().await.failed_attempts, 4);
    }

    #[tokio::test]
    async fn test_sweep_eventually_delivers_once() {
        let store = MemoryStore::new();
        let client = Arc::new(ScriptedClient::failing_first("ana@example.com", 1));
        let worker = worker(&store, client.clone(), RetryPolicy::unlimited());
        let lead = lead("ana@example.com");
        let id = lead.id();

        assert_eq!(worker.submit(lead).await, SubmissionStatus::FailedWillRetry);

        let report = worker.sweep().await;
        assert_eq!(report.delivered, 1);
        assert!(store.list_pending().await.unwrap().is_empty());

        // One fast-path attempt plus exactly one from the sweep
        assert_eq!(client.calls().await, vec![id, id]);
    }

    #[tokio::test]
    async fn test_storage_failure_skips_delivery() {
        let client = Arc::new(ScriptedClient::default());
        let worker = CrmSyncWorker::new(
            Arc::new(BrokenStore),
            client.clone(),
            config(RetryPolicy::unlimited()),
        );

        let status = worker.submit(lead("ana@example.com")).await;

        assert_eq!(status, SubmissionStatus::StorageFailed);
        assert!(client.calls().await.is_empty());
        assert_eq!(worker.stats().await.storage_errors, 1);
    }

    #[tokio::test]
    async fn test_sweep_reports_store_error() {
        let worker = CrmSyncWorker::new(
            Arc::new(BrokenStore),
            Arc::new(ScriptedClient::default()),
            config(RetryPolicy::unlimited()),
        );

        let report = worker.sweep().await;
        assert!(report.store_error.is_some());
        assert_eq!(report.attempted, 0);
    }

    #[tokio::test]
    async fn test_queued_when_fast_path_disabled() {
        let store = MemoryStore::new();
        let client = Arc::new(ScriptedClient::default());
        let worker = CrmSyncWorker::new(
            Arc::new(store.clone()),
            client.clone(),
            WorkerConfig {
                fast_path: false,
                ..config(RetryPolicy::unlimited())
            },
        );

        assert_eq!(
            worker.submit(lead("ana@example.com")).await,
            SubmissionStatus::Queued
        );
        assert!(client.calls().await.is_empty());
        assert_eq!(store.list_pending().await.unwrap().len(), 1);

        worker.sweep().await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_gives_up_but_keeps_record() {
        let store = MemoryStore::new();
        let client = Arc::new(ScriptedClient::always_failing("ana@example.com"));
        let policy = RetryPolicy {
            max_attempts: 2,
            max_age: None,
        };
        let worker = worker(&store, client.clone(), policy);

        assert_eq!(
            worker.submit(lead("ana@example.com")).await,
            SubmissionStatus::FailedWillRetry
        );

        let report = worker.sweep().await;
        assert_eq!(report.given_up, 1);

        // Given-up leads are not retried...
        let report = worker.sweep().await;
        assert_eq!(report.attempted, 0);
        assert_eq!(client.calls().await.len(), 2);

        // ...but stay queryable
        let entries = store.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].state, EntryState::GivenUp);
        assert_eq!(worker.stats().await.given_up, 1);
    }

    #[tokio::test]
    async fn test_overlapping_sweep_skipped() {
        let store = MemoryStore::new();
        store.save(&lead("ana@example.com")).await.unwrap();
        let client = Arc::new(ScriptedClient::slow(Duration::from_millis(50)));
        let worker = worker(&store, client.clone(), RetryPolicy::unlimited());

        let (first, second) = tokio::join!(worker.sweep(), worker.sweep());

        assert_eq!(first.delivered, 1);
        assert!(second.overlapped);
        assert_eq!(client.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sweep_skips_lead_in_flight() {
        let store = MemoryStore::new();
        let client = Arc::new(ScriptedClient::slow(Duration::from_millis(100)));
        let worker = worker(&store, client.clone(), RetryPolicy::unlimited());

        let (status, report) = tokio::join!(worker.submit(lead("ana@example.com")), async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            worker.sweep().await
        });

        assert_eq!(status, SubmissionStatus::Delivered);
        assert_eq!(report.in_flight, 1);
        assert_eq!(client.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sweep_skips_lead_delivered_by_fast_path() {
        let store = MemoryStore::new();
        let slow = lead("slow@example.com");
        store.save(&slow).await.unwrap();

        let mut delays = HashMap::new();
        delays.insert("slow@example.com".to_string(), Duration::from_millis(100));
        delays.insert("fast@example.com".to_string(), Duration::from_millis(30));
        let client = Arc::new(ScriptedClient {
            delays,
            ..Default::default()
        });
        let worker = worker(&store, client.clone(), RetryPolicy::unlimited());
        let fast = lead("fast@example.com");
        let fast_id = fast.id();

        // The sweep snapshots both leads, then spends 100ms on the slow one
        // while the fast path delivers the other
        let (status, report) = tokio::join!(worker.submit(fast), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            worker.sweep().await
        });

        assert_eq!(status, SubmissionStatus::Delivered);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.settled, 1);
        assert_eq!(client.calls().await, vec![fast_id, slow.id()]);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sweep_skips_cleared_and_given_up_leads() {
        let store = MemoryStore::new();
        let client = Arc::new(ScriptedClient::default());
        let worker = worker(&store, client.clone(), RetryPolicy::unlimited());
        let cleared = lead("cleared@example.com");
        let given_up = lead("given-up@example.com");
        store.save(&given_up).await.unwrap();

        assert_eq!(
            worker.deliver_one(&cleared).await,
            DeliveryOutcome::Settled { given_up: false }
        );

        store.mark_given_up(given_up.id(), "max attempts").await.unwrap();
        assert_eq!(
            worker.deliver_one(&given_up).await,
            DeliveryOutcome::Settled { given_up: true }
        );
        assert!(client.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_pending_count_includes_leads_saved_during_sweep() {
        let store = MemoryStore::new();
        store.save(&lead("ana@example.com")).await.unwrap();
        let client = Arc::new(ScriptedClient::slow(Duration::from_millis(50)));
        let worker = worker(&store, client, RetryPolicy::unlimited());

        let (report, _) = tokio::join!(worker.sweep(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.save(&lead("bia@example.com")).await.unwrap();
        });

        assert_eq!(report.delivered, 1);
        assert_eq!(report.pending_after, 1);
    }

    #[tokio::test]
    async fn test_start_only_once() {
        let store = MemoryStore::new();
        let worker = worker(
            &store,
            Arc::new(ScriptedClient::default()),
            RetryPolicy::unlimited(),
        );

        let handle = worker.start().unwrap();
        assert!(worker.is_started());
        assert!(matches!(worker.start(), Err(SyncError::AlreadyStarted)));

        handle.shutdown().await;
        assert!(matches!(worker.start(), Err(SyncError::AlreadyStarted)));
    }

    #[tokio::test]
    async fn test_background_sweep_reconciles() {
        let store = MemoryStore::new();
        let client = Arc::new(ScriptedClient::failing_first("ana@example.com", 2));
        let worker = worker(&store, client, RetryPolicy::unlimited());

        worker.submit(lead("ana@example.com")).await;
        let handle = worker.start().unwrap();

        let drained = tokio::time::timeout(Duration::from_secs(2), async {
            while !store.is_empty().await {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;

        handle.shutdown().await;
        assert!(drained.is_ok());
        assert!(worker.stats().await.sweeps >= 2);
    }
}
