//! Route command implementation

use crate::routes::{resolve, RouteDecision, StaticAuth};
use clap::Args;

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Path to resolve, e.g. /area-membros
    pub path: String,

    /// Resolve as a logged-in member
    #[arg(long)]
    pub authenticated: bool,
}

impl RouteArgs {
    pub fn execute(&self) -> anyhow::Result<()> {
        match resolve(&self.path, &StaticAuth(self.authenticated)) {
            RouteDecision::Render { page } => println!("render  {}", page.title()),
            RouteDecision::Redirect { to } => println!("redirect  {}", to),
            RouteDecision::NotFound => println!("not found"),
        }
        Ok(())
    }
}
