use clap::Parser;
use profit_estrategista::catalog::Catalog;
use profit_estrategista::cli::{Cli, Commands};
use profit_estrategista::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::from_toml(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    profit_estrategista::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Serve(args) => {
            tracing::info!("Starting CRM sync service");
            args.execute(&config).await?;
        }
        Commands::Submit(args) => args.execute(&config).await?,
        Commands::Sweep => {
            let app = profit_estrategista::app::App::new(config)?;
            let report = app.sweep().await;
            println!("Sweep complete");
            println!("  Attempted: {}", report.attempted);
            println!("  Delivered: {}", report.delivered);
            println!("  Retrying:  {}", report.retrying);
            println!("  Given up:  {}", report.given_up);
            println!("  Skipped:   {}", report.in_flight + report.settled);
            println!("  Pending:   {}", report.pending_after);
            if let Some(error) = report.store_error {
                anyhow::bail!("Pending store unavailable: {}", error);
            }
        }
        Commands::Pending(args) => args.execute(&config).await?,
        Commands::Requeue(args) => args.execute(&config).await?,
        Commands::Clear(args) => args.execute(&config).await?,
        Commands::Size(args) => args.execute()?,
        Commands::Route(args) => args.execute()?,
        Commands::Catalog => {
            let catalog = Catalog::new(config.catalog.clone());
            for product in catalog.products() {
                println!("{} [{}] ({})", product.name, product.kind, product.slug);
                for feature in &product.features {
                    println!("  - {}", feature);
                }
                for plan in &product.plans {
                    println!(
                        "  {}: R$ {:.2}/mês  {}",
                        plan.name, plan.monthly_price, plan.checkout_url
                    );
                }
            }
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  CRM: {} (timeout {}s)", config.crm.endpoint, config.crm.timeout_secs);
            println!("  Store: {}", config.store.path.display());
            println!(
                "  Sync: every {}s, fast path {}, max attempts {}, max age {}h",
                config.sync.sweep_interval_secs,
                config.sync.fast_path,
                config.sync.max_attempts,
                config.sync.max_age_hours
            );
            println!("  WhatsApp: {}", config.messaging.whatsapp_number);
            println!(
                "  Forms: {}",
                if config.forms.is_empty() {
                    "built-in".to_string()
                } else {
                    config.forms.iter().map(|f| f.id.as_str()).collect::<Vec<_>>().join(", ")
                }
            );
        }
    }

    Ok(())
}
