//! Command and result types for share ledger operations.
use crate::domain::models::appointment::Appointment;
use crate::domain::models::share::AppointmentShare;

#[derive(Debug, Clone)]
pub struct ProposeShareCommand {
    pub appointment_id: String,
    pub sharing_user_id: String,
    pub receiving_user_id: String,
    /// Percentage of the price offered to the covering walker (0-100)
    pub covering_percentage: u8,
    /// Whether this proposal stems from a recurring-share intent (informational)
    pub recurring_share: bool,
}

#[derive(Debug, Clone)]
pub struct ProposeShareResult {
    pub share: AppointmentShare,
}

#[derive(Debug, Clone)]
pub struct AcceptShareCommand {
    pub share_id: String,
}

#[derive(Debug, Clone)]
pub struct AcceptShareResult {
    pub share: AppointmentShare,
    /// The appointment with its delegation status updated
    pub appointment: Appointment,
}

#[derive(Debug, Clone)]
pub struct RejectShareCommand {
    pub share_id: String,
}

#[derive(Debug, Clone)]
pub struct RejectShareResult {
    pub share: AppointmentShare,
}

#[derive(Debug, Clone)]
pub struct CancelShareCommand {
    pub share_id: String,
}

#[derive(Debug, Clone)]
pub struct CancelShareResult {
    pub share: AppointmentShare,
}

#[derive(Debug, Clone)]
pub struct ListSharesCommand {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct ListSharesResult {
    /// Shares proposed by this user
    pub outgoing: Vec<AppointmentShare>,
    /// Shares awaiting or handled by this user as the covering walker
    pub incoming: Vec<AppointmentShare>,
}
