//! Pending-lead maintenance commands

use crate::config::Config;
use crate::lead::LeadId;
use crate::store::{EntryState, JsonFileStore, PendingLeadStore};
use clap::Args;

#[derive(Args, Debug)]
pub struct PendingArgs {
    /// Show only leads the worker gave up on
    #[arg(long)]
    pub given_up: bool,
}

impl PendingArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = JsonFileStore::new(config.store.path.clone());
        let entries: Vec<_> = store
            .entries()
            .await?
            .into_iter()
            .filter(|e| !self.given_up || e.state == EntryState::GivenUp)
            .collect();

        if entries.is_empty() {
            println!("No pending leads");
            return Ok(());
        }

        for entry in entries {
            let state = match entry.state {
                EntryState::Pending => "pending",
                EntryState::GivenUp => "given-up",
            };
            println!(
                "{}  {:<8}  {:<18}  {}  attempts={}  created={}",
                entry.lead.id(),
                state,
                entry.lead.form_id(),
                entry.lead.email(),
                entry.lead.attempt_count(),
                entry.lead.created_at().format("%Y-%m-%d %H:%M"),
            );
            if let Some(error) = entry.last_error {
                println!("    last error: {}", error);
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RequeueArgs {
    /// Lead identifier
    pub id: LeadId,
}

impl RequeueArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = JsonFileStore::new(config.store.path.clone());
        store.requeue(self.id).await?;
        tracing::info!(lead_id = %self.id, "Lead requeued");
        println!("Lead {} requeued", self.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Lead identifier
    pub id: LeadId,
}

impl ClearArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let store = JsonFileStore::new(config.store.path.clone());
        let known = store
            .entries()
            .await?
            .iter()
            .any(|e| e.lead.id() == self.id);

        if !known {
            anyhow::bail!("Lead {} not found", self.id);
        }

        store.remove(self.id).await?;
        tracing::warn!(lead_id = %self.id, "Lead cleared manually without delivery");
        println!("Lead {} cleared", self.id);
        Ok(())
    }
}
