//! Application composition root
//!
//! Owns the collaborators of the lead pipeline and the lifecycle of the
//! background sweep.

use crate::catalog::Catalog;
use crate::config::Config;
use crate::crm::{CrmClient, HttpCrmClient, HttpCrmConfig};
use crate::lead::{FormCollector, FormDefinition, FormFields, Handoff, LeadId, LeadRecord, ValidationError, THANK_YOU_PATH};
use crate::messaging::{render_template, whatsapp_link};
use crate::store::{JsonFileStore, PendingLeadStore};
use crate::sync::{CrmSyncWorker, SubmissionStatus, SweepHandle, SweepReport, SyncError, SyncStats, WorkerConfig};
use crate::telemetry::{increment, CounterMetric};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Submission errors; both are resolved by re-prompting the visitor
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("unknown form: {0}")]
    UnknownForm(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// What the visitor sees after a valid submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub lead_id: LeadId,
    /// Delivery state at the time the call returned
    pub status: SubmissionStatus,
    /// Thank-you path or WhatsApp URL; present whatever the status
    pub redirect: String,
}

/// The lead pipeline wired together
pub struct App {
    config: Config,
    collector: FormCollector,
    catalog: Catalog,
    store: Arc<dyn PendingLeadStore>,
    worker: Arc<CrmSyncWorker>,
    sweep: Mutex<Option<SweepHandle>>,
}

impl App {
    /// Build the production pipeline: JSON-file store and HTTP CRM client
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let store = Arc::new(JsonFileStore::new(config.store.path.clone()));
        let client = Arc::new(HttpCrmClient::with_config(HttpCrmConfig::from(&config.crm))?);
        Ok(Self::with_collaborators(config, store, client))
    }

    /// Build the pipeline around the given store and CRM client
    pub fn with_collaborators(
        config: Config,
        store: Arc<dyn PendingLeadStore>,
        client: Arc<dyn CrmClient>,
    ) -> Self {
        let collector = FormCollector::new(config.forms.clone(), config.crm.default_tags.clone());
        let catalog = Catalog::new(config.catalog.clone());
        let worker = Arc::new(CrmSyncWorker::new(
            store.clone(),
            client,
            WorkerConfig::from(&config.sync),
        ));

        Self {
            config,
            collector,
            catalog,
            store,
            worker,
            sweep: Mutex::new(None),
        }
    }

    /// Start the periodic sweep; fails if it was already started
    pub async fn start(&self) -> Result<(), SyncError> {
        let handle = self.worker.start()?;
        *self.sweep.lock().await = Some(handle);
        Ok(())
    }

    /// Stop the periodic sweep if it is running
    pub async fn shutdown(&self) {
        if let Some(handle) = self.sweep.lock().await.take() {
            handle.shutdown().await;
        }
    }

    /// Validate, store and try to deliver a form submission
    ///
    /// Validation failures are returned to the caller. Once validation
    /// passes the visitor always gets a redirect; the status says whether
    /// the lead already reached the CRM.
    pub async fn submit(
        &self,
        form_id: &str,
        fields: &FormFields,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let form = self
            .collector
            .form(form_id)
            .ok_or_else(|| SubmitError::UnknownForm(form_id.to_string()))?;

        let lead = match self.collector.collect(form, fields) {
            Ok(lead) => lead,
            Err(e) => {
                increment(CounterMetric::ValidationFailed);
                return Err(e.into());
            }
        };

        let lead_id = lead.id();
        let redirect = self.redirect_for(form, &lead);
        let status = self.worker.submit(lead).await;

        tracing::info!(%lead_id, form = form_id, %status, "Lead submitted");

        Ok(SubmissionReceipt {
            lead_id,
            status,
            redirect,
        })
    }

    /// Run one sweep pass now
    pub async fn sweep(&self) -> SweepReport {
        self.worker.sweep().await
    }

    pub async fn stats(&self) -> SyncStats {
        self.worker.stats().await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn collector(&self) -> &FormCollector {
        &self.collector
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<dyn PendingLeadStore> {
        &self.store
    }

    fn redirect_for(&self, form: &FormDefinition, lead: &LeadRecord) -> String {
        match &form.handoff {
            Handoff::ThankYou { path } => path.clone(),
            Handoff::WhatsApp { template } => {
                let template = template.as_deref().unwrap_or(&self.config.messaging.greeting);
                let text = render_template(template, lead);
                match whatsapp_link(&self.config.messaging.whatsapp_number, &text) {
                    Ok(url) => url.to_string(),
                    Err(e) => {
                        tracing::warn!(error = %e, "WhatsApp handoff unavailable, using thank-you page");
                        THANK_YOU_PATH.to_string()
                    }
                }
            }
        }
    }
}
