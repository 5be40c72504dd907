//! Domain model for a walker connection (the "are these users connected" predicate).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::random_suffix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Declined,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Declined => "declined",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ConnectionStatus::Pending),
            "accepted" => Ok(ConnectionStatus::Accepted),
            "declined" => Ok(ConnectionStatus::Declined),
            _ => Err(format!("Invalid connection status: {}", s)),
        }
    }
}

/// A connection between two walkers. Shares may only be proposed between
/// users with an accepted connection, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkerConnection {
    pub id: String,
    pub requester_user_id: String,
    pub recipient_user_id: String,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WalkerConnection {
    /// Generate a unique connection ID.
    /// Format: connection::<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("connection::{}-{}", timestamp_ms, random_suffix(4))
    }

    /// Whether this connection links the two given users, in either direction
    pub fn links(&self, user_a: &str, user_b: &str) -> bool {
        (self.requester_user_id == user_a && self.recipient_user_id == user_b)
            || (self.requester_user_id == user_b && self.recipient_user_id == user_a)
    }
}
