//! Serve command implementation

use crate::app::App;
use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the sweep interval (seconds)
    #[arg(long)]
    pub interval: Option<u64>,
}

impl ServeArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        if let Some(secs) = self.interval {
            config.sync.sweep_interval_secs = secs;
        }

        let app = App::new(config)?;
        app.start().await?;

        tracing::info!(
            store = ?app.config().store.path,
            endpoint = %app.config().crm.endpoint,
            "CRM sync running, press Ctrl-C to stop"
        );

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown requested");
        app.shutdown().await;

        let stats = app.stats().await;
        tracing::info!(
            delivered = stats.delivered,
            failed_attempts = stats.failed_attempts,
            given_up = stats.given_up,
            sweeps = stats.sweeps,
            "CRM sync stopped"
        );
        Ok(())
    }
}
