//! Command and result types for settlement.
use chrono::NaiveDate;

use crate::domain::models::appointment::Appointment;
use crate::domain::models::earning::WalkerEarning;
use crate::domain::models::invoice::Invoice;

#[derive(Debug, Clone)]
pub struct SettleAppointmentCommand {
    pub appointment_id: String,
    /// Total compensation for the walk in minor currency units (cents)
    pub total_compensation: i64,
    /// Who reported the completion (audit/logging only); invoices record the
    /// covering walker when shared and the appointment owner otherwise
    pub completed_by_user_id: String,
    pub date_completed: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct SettleAppointmentResult {
    /// Present only when the walk was covered through an accepted share
    pub earning: Option<WalkerEarning>,
    pub invoice: Invoice,
    pub appointment: Appointment,
}
