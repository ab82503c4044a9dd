//! CLI interface for profit-estrategista
//!
//! Provides subcommands for:
//! - `serve`: Run the CRM sync sweep until interrupted
//! - `submit`: Submit a lead through a form
//! - `sweep`, `pending`, `requeue`, `clear`: Pending-lead maintenance
//! - `size`: Position-sizing calculator
//! - `route`: Resolve a site path
//! - `catalog`, `config`: Show products and configuration

mod leads;
mod route;
mod serve;
mod size;
mod submit;

pub use leads::{ClearArgs, PendingArgs, RequeueArgs};
pub use route::RouteArgs;
pub use serve::ServeArgs;
pub use size::SizeArgs;
pub use submit::SubmitArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "profit-estrategista")]
#[command(about = "Lead capture, CRM sync and trading calculators for Profit Estrategista")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the periodic CRM sync until Ctrl-C
    Serve(ServeArgs),
    /// Submit a lead through a form
    Submit(SubmitArgs),
    /// Run one sweep over pending leads
    Sweep,
    /// List leads awaiting delivery
    Pending(PendingArgs),
    /// Return a given-up lead to the retry queue
    Requeue(RequeueArgs),
    /// Delete a lead from the pending store
    Clear(ClearArgs),
    /// Compute position size for a trade
    Size(SizeArgs),
    /// Resolve a site path
    Route(RouteArgs),
    /// Show products and checkout links
    Catalog,
    /// Show configuration
    Config,
}
