//! CRM sync types

use crate::config::SyncConfig;
use crate::lead::LeadRecord;
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Sync worker errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// The periodic sweep runs once per worker
    #[error("sweep loop already started")]
    AlreadyStarted,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Caller-visible result of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionStatus {
    /// Stored; delivery left to the sweep
    Queued,
    /// Stored and accepted by the CRM
    Delivered,
    /// Stored; the first attempt failed and the sweep will retry
    FailedWillRetry,
    /// Stored; the retry policy allowed no further attempts
    GivenUp,
    /// Could not be stored, so no delivery was attempted
    StorageFailed,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubmissionStatus::Queued => "queued",
            SubmissionStatus::Delivered => "delivered",
            SubmissionStatus::FailedWillRetry => "failed-will-retry",
            SubmissionStatus::GivenUp => "given-up",
            SubmissionStatus::StorageFailed => "storage-failed",
        };
        f.write_str(s)
    }
}

/// Why the worker stopped retrying a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveUpReason {
    MaxAttempts(u32),
    MaxAge(chrono::Duration),
}

impl fmt::Display for GiveUpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GiveUpReason::MaxAttempts(n) => write!(f, "gave up after {} attempts", n),
            GiveUpReason::MaxAge(age) => write!(f, "gave up after {} hours", age.num_hours()),
        }
    }
}

/// Result of one delivery attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// CRM accepted the lead and it was removed from the store
    Delivered,
    /// Attempt failed; lead stays pending
    Retrying { attempts: u32 },
    /// Attempt failed and the retry policy is exhausted
    GivenUp(GiveUpReason),
    /// Another attempt for the same lead is already running
    InFlight,
    /// Lead left the pending set (delivered, cleared or given up) before
    /// its turn; nothing was sent
    Settled { given_up: bool },
}

/// Retry limits; a limit of zero or `None` means no limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum delivery attempts (0 = infinite)
    pub max_attempts: u32,
    /// Maximum age of a lead before giving up
    pub max_age: Option<chrono::Duration>,
}

impl RetryPolicy {
    /// Retry forever
    pub fn unlimited() -> Self {
        Self {
            max_attempts: 0,
            max_age: None,
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            max_age: (config.max_age_hours > 0)
                .then(|| chrono::Duration::hours(config.max_age_hours as i64)),
        }
    }

    /// Reason to stop retrying `lead`, if any
    pub fn exhausted(&self, lead: &LeadRecord, now: DateTime<Utc>) -> Option<GiveUpReason> {
        if self.max_attempts > 0 && lead.attempt_count() >= self.max_attempts {
            return Some(GiveUpReason::MaxAttempts(lead.attempt_count()));
        }

        if let Some(max_age) = self.max_age {
            if lead.age(now) >= max_age {
                return Some(GiveUpReason::MaxAge(max_age));
            }
        }

        None
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

/// Summary of one sweep pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub attempted: usize,
    pub delivered: usize,
    pub retrying: usize,
    pub given_up: usize,
    /// Leads skipped because a fast-path attempt was running
    pub in_flight: usize,
    /// Leads skipped because they were no longer pending
    pub settled: usize,
    /// Leads still pending once the pass finished
    pub pending_after: usize,
    /// Set when another sweep was already running and this one did nothing
    pub overlapped: bool,
    /// Store read failure that aborted the pass
    pub store_error: Option<String>,
}

impl SweepReport {
    pub(crate) fn overlapped() -> Self {
        Self {
            overlapped: true,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, outcome: &DeliveryOutcome) {
        match outcome {
            DeliveryOutcome::Delivered => {
                self.attempted += 1;
                self.delivered += 1;
            }
            DeliveryOutcome::Retrying { .. } => {
                self.attempted += 1;
                self.retrying += 1;
            }
            DeliveryOutcome::GivenUp(_) => {
                self.attempted += 1;
                self.given_up += 1;
            }
            DeliveryOutcome::InFlight => self.in_flight += 1,
            DeliveryOutcome::Settled { .. } => self.settled += 1,
        }
    }
}

/// Worker counters since construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub submitted: u64,
    pub delivered: u64,
    pub failed_attempts: u64,
    pub given_up: u64,
    pub storage_errors: u64,
    pub sweeps: u64,
}
