//! # WalkBuddy Backend
//!
//! Scheduling and revenue-split core for a dog-walking service. Appointments
//! (recurring templates and their one-time clones), the share ledger that
//! delegates walks between connected walkers, and the settlement step that
//! turns completed walks into earnings and invoices.
//!
//! Storage is CSV files under a data directory; all operations are
//! synchronous, serialized through a process-wide write lock.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod dto;
pub mod storage;

pub use storage::csv::CsvConnection;

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub appointment_service: domain::AppointmentService,
    pub share_service: domain::ShareService,
    pub settlement_service: domain::SettlementService,
    pub connection_service: domain::ConnectionService,
}

impl Backend {
    /// Create a new backend instance with all services sharing one data directory
    pub fn new(data_directory: impl AsRef<Path>) -> Result<Self> {
        let csv_conn = Arc::new(CsvConnection::new(data_directory)?);

        Ok(Backend {
            appointment_service: domain::AppointmentService::new(csv_conn.clone()),
            share_service: domain::ShareService::new(csv_conn.clone()),
            settlement_service: domain::SettlementService::new(csv_conn.clone()),
            connection_service: domain::ConnectionService::new(csv_conn),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::appointment::CreateAppointmentCommand;
    use crate::domain::commands::connection::{
        RequestConnectionCommand, RespondToConnectionCommand,
    };
    use crate::domain::commands::settlement::SettleAppointmentCommand;
    use crate::domain::commands::share::{AcceptShareCommand, ProposeShareCommand};
    use crate::domain::models::appointment::WeekdayFlags;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::tempdir;

    // full path from proposal to settlement, the way a frontend would drive it
    #[test]
    fn test_share_and_settle_end_to_end() {
        let temp_dir = tempdir().unwrap();
        let backend = Backend::new(temp_dir.path()).unwrap();

        let connection = backend
            .connection_service
            .request_connection(RequestConnectionCommand {
                requester_user_id: "user::owner".to_string(),
                recipient_user_id: "user::cover".to_string(),
            })
            .unwrap()
            .connection;
        backend
            .connection_service
            .respond_to_connection(RespondToConnectionCommand {
                connection_id: connection.id,
                accept: true,
            })
            .unwrap();

        let appointment = backend
            .appointment_service
            .create_appointment(CreateAppointmentCommand {
                user_id: "user::owner".to_string(),
                pet_id: "pet::rex".to_string(),
                recurring: false,
                appointment_date: Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()),
                weekdays: WeekdayFlags::default(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
                duration_minutes: 30,
                price: 5000,
            })
            .unwrap()
            .appointment;

        let share = backend
            .share_service
            .propose_share(ProposeShareCommand {
                appointment_id: appointment.id.clone(),
                sharing_user_id: "user::owner".to_string(),
                receiving_user_id: "user::cover".to_string(),
                covering_percentage: 60,
                recurring_share: false,
            })
            .unwrap()
            .share;
        backend
            .share_service
            .accept_share(AcceptShareCommand { share_id: share.id })
            .unwrap();

        let settled = backend
            .settlement_service
            .settle_appointment(SettleAppointmentCommand {
                appointment_id: appointment.id,
                total_compensation: 5000,
                completed_by_user_id: "user::cover".to_string(),
                date_completed: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            })
            .unwrap();

        let earning = settled.earning.unwrap();
        assert_eq!(earning.compensation, 3000);
        assert_eq!(settled.invoice.compensation, 2000);
        assert!(settled.appointment.completed);
    }
}
