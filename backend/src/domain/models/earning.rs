//! Domain model for a walker earning (settlement output for the covering walker).
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::random_suffix;

/// Payout state of an earning.
///
/// Stored as a single enum internally; the `paid`/`pending` boolean pair only
/// exists at the serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutStatus {
    Pending,
    Paid,
}

impl PayoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PayoutStatus::Pending),
            "paid" => Ok(PayoutStatus::Paid),
            _ => Err(format!("Invalid payout status: {}", s)),
        }
    }
}

/// Append-only settlement fact: amount owed to the covering walker.
/// Immutable after creation except for the payout status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkerEarning {
    pub id: String,
    pub appointment_id: String,
    pub share_id: String,
    /// The covering walker being paid
    pub walker_user_id: String,
    pub pet_id: String,
    pub date_completed: NaiveDate,
    /// Covering walker's share in minor currency units (cents)
    pub compensation: i64,
    /// Covering percentage at settlement time
    pub split_percentage: u8,
    pub status: PayoutStatus,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl WalkerEarning {
    /// Generate a unique earning ID.
    /// Format: earning::<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("earning::{}-{}", timestamp_ms, random_suffix(4))
    }
}
