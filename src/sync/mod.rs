//! CRM sync module
//!
//! Moves leads from the pending store to the CRM: a fast-path attempt right
//! after submission and a periodic sweep that retries whatever is left.

mod types;
mod worker;

pub use types::{
    DeliveryOutcome, GiveUpReason, RetryPolicy, SubmissionStatus, SweepReport, SyncError,
    SyncStats,
};
pub use worker::{CrmSyncWorker, SweepHandle, WorkerConfig};
