//! Domain model for an appointment share (delegation proposal).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::random_suffix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareStatus {
    Pending,
    Accepted,
    Rejected,
    Canceled,
}

impl ShareStatus {
    /// Convert to string for CSV storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareStatus::Pending => "pending",
            ShareStatus::Accepted => "accepted",
            ShareStatus::Rejected => "rejected",
            ShareStatus::Canceled => "canceled",
        }
    }

    /// Parse from string for CSV loading
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ShareStatus::Pending),
            "accepted" => Ok(ShareStatus::Accepted),
            "rejected" => Ok(ShareStatus::Rejected),
            "canceled" => Ok(ShareStatus::Canceled),
            _ => Err(format!("Invalid share status: {}", s)),
        }
    }

    /// Pending and accepted shares block further proposals for the same appointment
    pub fn is_active(&self) -> bool {
        matches!(self, ShareStatus::Pending | ShareStatus::Accepted)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentShare {
    pub id: String,
    /// The one-time appointment being delegated
    pub appointment_id: String,
    /// The original owner proposing the share
    pub sharing_user_id: String,
    /// The walker being asked to cover the walk
    pub receiving_user_id: String,
    /// Percentage of the price offered to the covering walker (0-100)
    pub covering_walker_percentage: u8,
    pub status: ShareStatus,
    /// Whether this share was produced by a recurring-share intent (informational)
    pub recurring_share: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppointmentShare {
    /// Generate a unique share ID.
    /// Format: share::<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("share::{}-{}", timestamp_ms, random_suffix(4))
    }

    /// Percentage retained by the original owner
    pub fn original_walker_percentage(&self) -> u8 {
        100 - self.covering_walker_percentage
    }
}

/// Errors surfaced by the share ledger
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Recurring templates cannot be shared directly; clone an occurrence first")]
    RecurringNotShareable,
    #[error("Appointment already has an active share")]
    AlreadyDelegated,
    #[error("Invalid split percentage: {0} (must be 0-100)")]
    InvalidSplit(u8),
    #[error("Users {0} and {1} are not connected")]
    UsersNotConnected(String, String),
    #[error("Share is {0} - transition not allowed")]
    InvalidStateTransition(&'static str),
    #[error("Appointment {0} is already completed")]
    AppointmentCompleted(String),
    #[error("Appointment not found: {0}")]
    AppointmentNotFound(String),
    #[error("Share not found: {0}")]
    ShareNotFound(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
