//! Shared builders for repository and service tests.

use chrono::{NaiveDate, NaiveTime, Utc};

use crate::domain::models::appointment::{Appointment, DelegationStatus, WeekdayFlags};
use crate::domain::models::connection::{ConnectionStatus, WalkerConnection};
use crate::domain::models::earning::{PayoutStatus, WalkerEarning};
use crate::domain::models::invoice::{Invoice, InvoiceStatus};
use crate::domain::models::share::{AppointmentShare, ShareStatus};

/// A one-time appointment on 2026-09-01, 09:00-09:30, priced at 5000 cents
pub fn one_time_appointment(user_id: &str, pet_id: &str) -> Appointment {
    let now = Utc::now();
    Appointment {
        id: Appointment::generate_id(now.timestamp_millis() as u64),
        user_id: user_id.to_string(),
        pet_id: pet_id.to_string(),
        recurring: false,
        appointment_date: Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()),
        weekdays: WeekdayFlags::default(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        duration_minutes: 30,
        price: 5000,
        completed: false,
        canceled: false,
        delegation_status: DelegationStatus::None,
        cloned_from_appointment_id: None,
        created_at: now,
        updated_at: now,
    }
}

/// A recurring Monday/Wednesday template, 09:00-09:30, priced at 5000 cents
pub fn recurring_template(user_id: &str, pet_id: &str) -> Appointment {
    let now = Utc::now();
    Appointment {
        id: Appointment::generate_id(now.timestamp_millis() as u64),
        user_id: user_id.to_string(),
        pet_id: pet_id.to_string(),
        recurring: true,
        appointment_date: None,
        weekdays: WeekdayFlags {
            monday: true,
            wednesday: true,
            ..WeekdayFlags::default()
        },
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        duration_minutes: 30,
        price: 5000,
        completed: false,
        canceled: false,
        delegation_status: DelegationStatus::None,
        cloned_from_appointment_id: None,
        created_at: now,
        updated_at: now,
    }
}

/// A pending share proposal for the given appointment
pub fn pending_share(
    appointment_id: &str,
    sharing_user_id: &str,
    receiving_user_id: &str,
    covering_percentage: u8,
) -> AppointmentShare {
    let now = Utc::now();
    AppointmentShare {
        id: AppointmentShare::generate_id(now.timestamp_millis() as u64),
        appointment_id: appointment_id.to_string(),
        sharing_user_id: sharing_user_id.to_string(),
        receiving_user_id: receiving_user_id.to_string(),
        covering_walker_percentage: covering_percentage,
        status: ShareStatus::Pending,
        recurring_share: false,
        created_at: now,
        updated_at: now,
    }
}

/// A pending earning for the given appointment/share
pub fn earning_for(
    appointment_id: &str,
    share_id: &str,
    walker_user_id: &str,
    compensation: i64,
    split_percentage: u8,
) -> WalkerEarning {
    let now = Utc::now();
    WalkerEarning {
        id: WalkerEarning::generate_id(now.timestamp_millis() as u64),
        appointment_id: appointment_id.to_string(),
        share_id: share_id.to_string(),
        walker_user_id: walker_user_id.to_string(),
        pet_id: "pet::1".to_string(),
        date_completed: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        compensation,
        split_percentage,
        status: PayoutStatus::Pending,
        title: "Covered walk on 2026-09-01".to_string(),
        created_at: now,
    }
}

/// A pending invoice for the given appointment
pub fn invoice_for(
    appointment_id: &str,
    compensation: i64,
    is_shared: bool,
    split_percentage: u8,
    completed_by_user_id: &str,
) -> Invoice {
    let now = Utc::now();
    Invoice {
        id: Invoice::generate_id(now.timestamp_millis() as u64),
        appointment_id: appointment_id.to_string(),
        pet_id: "pet::1".to_string(),
        date_completed: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        compensation,
        is_shared,
        split_percentage,
        completed_by_user_id: completed_by_user_id.to_string(),
        status: InvoiceStatus::Pending,
        title: "Walk on 2026-09-01".to_string(),
        created_at: now,
    }
}

/// A connection between two walkers with the given status
pub fn connection_between(
    requester_user_id: &str,
    recipient_user_id: &str,
    status: ConnectionStatus,
) -> WalkerConnection {
    let now = Utc::now();
    WalkerConnection {
        id: WalkerConnection::generate_id(now.timestamp_millis() as u64),
        requester_user_id: requester_user_id.to_string(),
        recipient_user_id: recipient_user_id.to_string(),
        status,
        created_at: now,
        updated_at: now,
    }
}
