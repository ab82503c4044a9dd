//! Submit-to-CRM pipeline with a scripted CRM

use async_trait::async_trait;
use profit_estrategista::app::{App, SubmitError};
use profit_estrategista::config::Config;
use profit_estrategista::crm::{CrmClient, DeliveryError};
use profit_estrategista::lead::{FormFields, LeadRecord};
use profit_estrategista::store::{EntryState, MemoryStore, PendingLeadStore};
use profit_estrategista::sync::SubmissionStatus;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// CRM that can be switched up and down and records what it accepted
#[derive(Default)]
struct ToggleCrm {
    up: AtomicBool,
    accepted: Mutex<Vec<String>>,
}

impl ToggleCrm {
    fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }
}

#[async_trait]
impl CrmClient for ToggleCrm {
    async fn deliver(&self, lead: &LeadRecord) -> Result<(), DeliveryError> {
        if self.up.load(Ordering::SeqCst) {
            self.accepted.lock().await.push(lead.email().to_string());
            Ok(())
        } else {
            Err(DeliveryError::Timeout)
        }
    }
}

fn pipeline(config: Config) -> (App, MemoryStore, Arc<ToggleCrm>) {
    let store = MemoryStore::new();
    let crm = Arc::new(ToggleCrm::default());
    let app = App::with_collaborators(config, Arc::new(store.clone()), crm.clone());
    (app, store, crm)
}

fn visitor(email: &str) -> FormFields {
    FormFields::new("Carlos Lima", email, "21977776666").with_field("interesse", "robôs")
}

#[tokio::test]
async fn test_outage_then_recovery_delivers_once() {
    let (app, store, crm) = pipeline(Config::default());

    let receipt = app.submit("robos", &visitor("carlos@example.com")).await.unwrap();
    assert_eq!(receipt.status, SubmissionStatus::FailedWillRetry);
    assert_eq!(receipt.redirect, "/obrigado");
    assert_eq!(store.len().await, 1);

    // Still down: the lead stays queued
    let report = app.sweep().await;
    assert_eq!(report.retrying, 1);
    assert_eq!(store.len().await, 1);

    crm.set_up(true);
    let report = app.sweep().await;
    assert_eq!(report.delivered, 1);
    assert!(store.is_empty().await);

    // Nothing left to resend
    app.sweep().await;
    assert_eq!(*crm.accepted.lock().await, vec!["carlos@example.com".to_string()]);

    let stats = app.stats().await;
    assert_eq!(stats.submitted, 1);
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.failed_attempts, 2);
}

#[tokio::test]
async fn test_lead_carries_form_tags() {
    let (app, store, _crm) = pipeline(Config::default());
    app.submit("copy-trading", &visitor("bia@example.com")).await.unwrap();

    let pending = store.list_pending().await.unwrap();
    let tags = pending[0].tags();
    assert!(tags.contains("site"));
    assert!(tags.contains("copy-trading"));
    assert!(tags.contains("form:copy-trading"));
    assert_eq!(pending[0].attempt_count(), 1);
}

#[tokio::test]
async fn test_invalid_submission_never_queued() {
    let (app, store, crm) = pipeline(Config::default());
    crm.set_up(true);

    let fields = FormFields::new("", "not-an-email", "");
    let err = app.submit("contato", &fields).await.unwrap_err();
    match err {
        SubmitError::Validation(v) => {
            assert!(v.has("name"));
            assert!(v.has("email"));
            assert!(v.has("phone"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(store.is_empty().await);
    assert!(crm.accepted.lock().await.is_empty());
}

#[tokio::test]
async fn test_required_custom_field() {
    let (app, _store, _crm) = pipeline(Config::default());

    let err = app
        .submit("mesa-proprietaria", &visitor("dani@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Validation(ref v) if v.has("budget")));

    let ok = app
        .submit(
            "mesa-proprietaria",
            &visitor("dani@example.com").with_field("budget", "50k"),
        )
        .await;
    assert!(ok.is_ok());
}

#[tokio::test]
async fn test_queue_only_mode_waits_for_sweep() {
    let mut config = Config::default();
    config.sync.fast_path = false;
    let (app, store, crm) = pipeline(config);
    crm.set_up(true);

    let receipt = app.submit("robos", &visitor("eva@example.com")).await.unwrap();
    assert_eq!(receipt.status, SubmissionStatus::Queued);
    assert_eq!(store.len().await, 1);
    assert!(crm.accepted.lock().await.is_empty());

    app.sweep().await;
    assert!(store.is_empty().await);
    assert_eq!(crm.accepted.lock().await.len(), 1);
}

#[tokio::test]
async fn test_give_up_after_attempt_cap() {
    let mut config = Config::default();
    config.sync.max_attempts = 2;
    let (app, store, _crm) = pipeline(config);

    let receipt = app.submit("robos", &visitor("fabio@example.com")).await.unwrap();
    assert_eq!(receipt.status, SubmissionStatus::FailedWillRetry);

    let report = app.sweep().await;
    assert_eq!(report.given_up, 1);
    assert!(store.list_pending().await.unwrap().is_empty());

    let entries = store.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].state, EntryState::GivenUp);

    // Operator requeue puts it back in rotation
    store.requeue(receipt.lead_id).await.unwrap();
    assert_eq!(store.list_pending().await.unwrap().len(), 1);
}
