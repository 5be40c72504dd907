use serde::{Deserialize, Serialize};

/// Appointment ID in format: "appointment::epoch_millis-suffix"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    /// ID of the user who owns this appointment (the original walker)
    pub user_id: String,
    /// ID of the pet being walked
    pub pet_id: String,
    /// Whether this is a recurring template (weekday pattern) or a one-time instance
    pub recurring: bool,
    /// Calendar date (YYYY-MM-DD) - meaningful for one-time instances only
    pub appointment_date: Option<String>,
    pub sunday: bool,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    /// Start time of the walk (HH:MM)
    pub start_time: String,
    /// End time of the walk (HH:MM)
    pub end_time: String,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// Price in minor currency units (cents)
    pub price: i64,
    pub completed: bool,
    pub canceled: bool,
    /// Delegation status: "none", "shared", "accepted" or "completed"
    pub delegation_status: String,
    /// Back-reference to the recurring template this instance was cloned from
    pub cloned_from_appointment_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A proposal to delegate a one-time appointment to another walker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentShare {
    pub id: String,
    /// ID of the one-time appointment being delegated
    pub appointment_id: String,
    /// ID of the user proposing the share (original owner)
    pub sharing_user_id: String,
    /// ID of the user being asked to cover the walk
    pub receiving_user_id: String,
    /// Percentage of the price that goes to the covering walker (0-100)
    pub covering_walker_percentage: u8,
    /// Percentage retained by the original owner (100 - covering)
    pub original_walker_percentage: u8,
    /// Share status: "pending", "accepted", "rejected" or "canceled"
    pub status: String,
    /// Whether this share was produced by a recurring-share intent (informational)
    pub recurring_share: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Amount owed to the covering walker after a shared walk completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkerEarning {
    pub id: String,
    pub appointment_id: String,
    pub share_id: String,
    /// ID of the covering walker being paid
    pub walker_user_id: String,
    pub pet_id: String,
    /// Date the walk was completed (YYYY-MM-DD)
    pub date_completed: String,
    /// Covering walker's share in minor currency units (cents)
    pub compensation: i64,
    /// Covering percentage at settlement time
    pub split_percentage: u8,
    pub paid: bool,
    pub pending: bool,
    pub title: String,
    pub created_at: String,
}

/// Amount billed to the original owner's client after a walk completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub appointment_id: String,
    pub pet_id: String,
    /// Date the walk was completed (YYYY-MM-DD)
    pub date_completed: String,
    /// Billed amount in minor currency units (cents)
    pub compensation: i64,
    /// Whether this invoice came from a shared (delegated) walk
    pub is_shared: bool,
    /// Percentage retained by the original owner at settlement time
    pub split_percentage: u8,
    /// ID of the user who actually performed the walk
    pub completed_by_user_id: String,
    pub paid: bool,
    pub pending: bool,
    pub cancelled: bool,
    pub title: String,
    pub created_at: String,
}

/// Connection between two walkers (required before sharing appointments)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkerConnection {
    pub id: String,
    pub requester_user_id: String,
    pub recipient_user_id: String,
    /// Connection status: "pending", "accepted" or "declined"
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request to create an appointment (template or one-time instance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub user_id: String,
    pub pet_id: String,
    pub recurring: bool,
    /// Required for one-time appointments (YYYY-MM-DD)
    pub appointment_date: Option<String>,
    pub sunday: bool,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: u32,
    /// Price in minor currency units (cents)
    pub price: i64,
}

/// Response after creating an appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointmentResponse {
    pub appointment: Appointment,
    pub success_message: String,
}

/// Request to clone a recurring template into one-time instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloneRecurringRequest {
    pub template_appointment_id: String,
    /// Target calendar dates (YYYY-MM-DD) for the new one-time instances
    pub dates: Vec<String>,
}

/// Response after cloning a recurring template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloneRecurringResponse {
    pub appointments: Vec<Appointment>,
    /// Dates for which clone persistence failed (best-effort batch)
    pub failed_dates: Vec<String>,
}

/// Request to propose delegating an appointment to another walker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposeShareRequest {
    pub appointment_id: String,
    pub sharing_user_id: String,
    pub receiving_user_id: String,
    /// Percentage of the price offered to the covering walker (0-100)
    pub covering_percentage: u8,
    pub recurring_share: bool,
}

/// Response after proposing a share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposeShareResponse {
    pub share: AppointmentShare,
    pub success_message: String,
}

/// Request to accept a pending share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptShareRequest {
    pub share_id: String,
}

/// Response after accepting a share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptShareResponse {
    pub share: AppointmentShare,
    pub appointment: Appointment,
    pub success_message: String,
}

/// Request to reject a pending share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectShareRequest {
    pub share_id: String,
}

/// Request to cancel a pending or accepted share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelShareRequest {
    pub share_id: String,
}

/// Response after rejecting or canceling a share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareStatusResponse {
    pub share: AppointmentShare,
    pub success_message: String,
}

/// Request to settle a completed appointment into billing records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleAppointmentRequest {
    pub appointment_id: String,
    /// Total compensation for the walk in minor currency units (cents)
    pub total_compensation: i64,
    pub completed_by_user_id: String,
    /// Date the walk was completed (YYYY-MM-DD)
    pub date_completed: String,
}

/// Response after settling an appointment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleAppointmentResponse {
    /// Present only when the appointment was covered through an accepted share
    pub earning: Option<WalkerEarning>,
    pub invoice: Invoice,
    pub success_message: String,
}

/// Request to connect two walkers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestConnectionRequest {
    pub requester_user_id: String,
    pub recipient_user_id: String,
}

/// Response carrying a walker connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionResponse {
    pub connection: WalkerConnection,
    pub success_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    // the JSON field names are the wire contract frontends depend on
    #[test]
    fn test_earning_json_shape() {
        let earning = WalkerEarning {
            id: "earning::1700000000000-a3f1".to_string(),
            appointment_id: "appointment::1".to_string(),
            share_id: "share::1".to_string(),
            walker_user_id: "user::2".to_string(),
            pet_id: "pet::1".to_string(),
            date_completed: "2026-09-01".to_string(),
            compensation: 3000,
            split_percentage: 60,
            paid: false,
            pending: true,
            title: "Covered walk on 2026-09-01".to_string(),
            created_at: "2026-09-01T12:00:00+00:00".to_string(),
        };

        let json = serde_json::to_value(&earning).unwrap();
        assert_eq!(json["compensation"], 3000);
        assert_eq!(json["split_percentage"], 60);
        assert_eq!(json["pending"], true);
        assert_eq!(json["paid"], false);

        let back: WalkerEarning = serde_json::from_value(json).unwrap();
        assert_eq!(back, earning);
    }

    #[test]
    fn test_clone_request_json_shape() {
        let request: CloneRecurringRequest = serde_json::from_str(
            r#"{"template_appointment_id":"appointment::1","dates":["2026-09-07","2026-09-14"]}"#,
        )
        .unwrap();
        assert_eq!(request.template_appointment_id, "appointment::1");
        assert_eq!(request.dates.len(), 2);
    }
}
