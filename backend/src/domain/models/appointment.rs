//! Domain model for an appointment (recurring template or one-time instance).
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::random_suffix;

/// Delegation status of a one-time appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelegationStatus {
    None,
    Shared,
    Accepted,
    Completed,
}

impl DelegationStatus {
    /// Convert to string for CSV storage
    pub fn as_str(&self) -> &'static str {
        match self {
            DelegationStatus::None => "none",
            DelegationStatus::Shared => "shared",
            DelegationStatus::Accepted => "accepted",
            DelegationStatus::Completed => "completed",
        }
    }

    /// Parse from string for CSV loading
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "none" => Ok(DelegationStatus::None),
            "shared" => Ok(DelegationStatus::Shared),
            "accepted" => Ok(DelegationStatus::Accepted),
            "completed" => Ok(DelegationStatus::Completed),
            _ => Err(format!("Invalid delegation status: {}", s)),
        }
    }
}

/// Weekday pattern for recurring templates.
///
/// Day-of-week numbering follows `num_days_from_sunday`: 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayFlags {
    pub sunday: bool,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
}

impl WeekdayFlags {
    /// Check whether the flag for a day of week (0 = Sunday .. 6 = Saturday) is set
    pub fn is_set(&self, day_of_week: u8) -> bool {
        match day_of_week {
            0 => self.sunday,
            1 => self.monday,
            2 => self.tuesday,
            3 => self.wednesday,
            4 => self.thursday,
            5 => self.friday,
            6 => self.saturday,
            _ => false,
        }
    }

    /// Whether any weekday is enabled
    pub fn any(&self) -> bool {
        self.sunday
            || self.monday
            || self.tuesday
            || self.wednesday
            || self.thursday
            || self.friday
            || self.saturday
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    /// Owning user (the original walker)
    pub user_id: String,
    pub pet_id: String,
    /// True for recurring templates, false for one-time instances
    pub recurring: bool,
    /// Calendar date of the walk - meaningful for one-time instances only
    pub appointment_date: Option<NaiveDate>,
    /// Weekday pattern - meaningful only when `recurring` is true
    pub weekdays: WeekdayFlags,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: u32,
    /// Price in minor currency units (cents)
    pub price: i64,
    pub completed: bool,
    pub canceled: bool,
    pub delegation_status: DelegationStatus,
    /// Back-reference to the recurring template this instance was cloned from.
    /// Never mutated after creation.
    pub cloned_from_appointment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Generate a unique appointment ID.
    /// Format: appointment::<timestamp_ms>-<random_suffix>
    pub fn generate_id(timestamp_ms: u64) -> String {
        format!("appointment::{}-{}", timestamp_ms, random_suffix(4))
    }

    /// Whether a recurring template occurs on the given calendar date.
    ///
    /// Pure weekday-flag lookup; always false for one-time instances.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        if !self.recurring {
            return false;
        }
        let day_of_week = date.weekday().num_days_from_sunday() as u8;
        self.weekdays.is_set(day_of_week)
    }

    /// Derive a one-time instance from this recurring template for a specific date.
    ///
    /// Copies times, duration, price, pet and owner; the instance starts with a
    /// clean completion/delegation state and a lineage back-reference.
    pub fn clone_for_date(&self, date: NaiveDate, now: DateTime<Utc>) -> Appointment {
        Appointment {
            id: Appointment::generate_id(now.timestamp_millis() as u64),
            user_id: self.user_id.clone(),
            pet_id: self.pet_id.clone(),
            recurring: false,
            appointment_date: Some(date),
            weekdays: WeekdayFlags::default(),
            start_time: self.start_time,
            end_time: self.end_time,
            duration_minutes: self.duration_minutes,
            price: self.price,
            completed: false,
            canceled: false,
            delegation_status: DelegationStatus::None,
            cloned_from_appointment_id: Some(self.id.clone()),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found: {0}")]
    NotFound(String),
    #[error("Appointment {0} is not a recurring template")]
    NotRecurring(String),
    #[error("One-time appointments require an appointment date")]
    MissingDate,
    #[error("Recurring templates require at least one weekday")]
    NoWeekdaySelected,
    #[error("Price cannot be negative")]
    NegativePrice,
    #[error("Appointment {0} is already completed")]
    AlreadyCompleted(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
