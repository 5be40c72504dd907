//! Command and result types for appointment operations.
use chrono::{NaiveDate, NaiveTime};

use crate::domain::models::appointment::{Appointment, WeekdayFlags};

#[derive(Debug, Clone)]
pub struct CreateAppointmentCommand {
    pub user_id: String,
    pub pet_id: String,
    pub recurring: bool,
    /// Required for one-time appointments
    pub appointment_date: Option<NaiveDate>,
    /// Weekday pattern - required for recurring templates
    pub weekdays: WeekdayFlags,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: u32,
    /// Price in minor currency units (cents)
    pub price: i64,
}

#[derive(Debug, Clone)]
pub struct CreateAppointmentResult {
    pub appointment: Appointment,
}

#[derive(Debug, Clone)]
pub struct GetAppointmentCommand {
    pub appointment_id: String,
}

#[derive(Debug, Clone)]
pub struct GetAppointmentResult {
    pub appointment: Option<Appointment>,
}

#[derive(Debug, Clone)]
pub struct ListAppointmentsCommand {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct ListAppointmentsResult {
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone)]
pub struct CloneRecurringCommand {
    pub template_appointment_id: String,
    /// Target calendar dates for the new one-time instances
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct CloneRecurringResult {
    pub appointments: Vec<Appointment>,
    /// Dates whose clone could not be persisted (best-effort batch)
    pub failed_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct CancelAppointmentCommand {
    pub appointment_id: String,
}

#[derive(Debug, Clone)]
pub struct CancelAppointmentResult {
    pub appointment: Appointment,
}
