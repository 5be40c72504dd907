//! Domain model for an invoice (settlement output billed to the original owner's client).
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::random_suffix;

/// Billing state of an invoice.
///
/// Stored as a single enum internally so invalid flag combinations (e.g. paid
/// and pending at once) cannot exist; the boolean triple only appears in DTOs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            "cancelled" => Ok(InvoiceStatus::Cancelled),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// Append-only settlement fact: amount billed for a completed walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub appointment_id: String,
    pub pet_id: String,
    pub date_completed: NaiveDate,
    /// Billed amount in minor currency units (cents) - the original owner's
    /// share when the walk was delegated, or the full price when it was not
    pub compensation: i64,
    pub is_shared: bool,
    /// Percentage retained by the original owner at settlement time
    pub split_percentage: u8,
    /// The user who actually performed the walk
    pub completed_by_user_id: String,
    pub status: InvoiceStatus,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Generate a unique invoice ID.
    /// Format: invoice::<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("invoice::{}-{}", timestamp_ms, random_suffix(4))
    }
}
