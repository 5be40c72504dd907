//! Appointment domain logic: creation, occurrence windows and the clone
//! generator that turns recurring templates into shareable one-time instances.

use chrono::Utc;
use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::appointment::{
    CancelAppointmentCommand, CancelAppointmentResult, CloneRecurringCommand,
    CloneRecurringResult, CreateAppointmentCommand, CreateAppointmentResult,
    GetAppointmentCommand, GetAppointmentResult, ListAppointmentsCommand,
    ListAppointmentsResult,
};
use crate::domain::models::appointment::{Appointment, AppointmentError, DelegationStatus, WeekdayFlags};
use crate::storage::csv::{AppointmentRepository, CsvConnection, ShareRepository};
use crate::storage::traits::{AppointmentStorage, ShareStorage};

/// Service for managing appointments and their recurring/one-time lifecycle
#[derive(Clone)]
pub struct AppointmentService {
    connection: Arc<CsvConnection>,
    appointment_repository: AppointmentRepository,
    share_repository: ShareRepository,
}

impl AppointmentService {
    /// Create a new AppointmentService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            appointment_repository: AppointmentRepository::new(csv_conn.clone()),
            share_repository: ShareRepository::new(csv_conn.clone()),
            connection: csv_conn,
        }
    }

    /// Create a recurring template or a one-time appointment
    pub fn create_appointment(
        &self,
        command: CreateAppointmentCommand,
    ) -> Result<CreateAppointmentResult, AppointmentError> {
        info!(
            "Creating {} appointment for user {} / pet {}",
            if command.recurring { "recurring" } else { "one-time" },
            command.user_id,
            command.pet_id
        );

        if command.price < 0 {
            return Err(AppointmentError::NegativePrice);
        }
        if command.recurring && !command.weekdays.any() {
            return Err(AppointmentError::NoWeekdaySelected);
        }
        if !command.recurring && command.appointment_date.is_none() {
            return Err(AppointmentError::MissingDate);
        }

        let _guard = self.connection.write_lock();

        let now = Utc::now();
        let appointment = Appointment {
            id: Appointment::generate_id(now.timestamp_millis() as u64),
            user_id: command.user_id,
            pet_id: command.pet_id,
            recurring: command.recurring,
            // templates carry no concrete date, instances always do
            appointment_date: if command.recurring {
                None
            } else {
                command.appointment_date
            },
            weekdays: if command.recurring {
                command.weekdays
            } else {
                WeekdayFlags::default()
            },
            start_time: command.start_time,
            end_time: command.end_time,
            duration_minutes: command.duration_minutes,
            price: command.price,
            completed: false,
            canceled: false,
            delegation_status: DelegationStatus::None,
            cloned_from_appointment_id: None,
            created_at: now,
            updated_at: now,
        };

        self.appointment_repository.store_appointment(&appointment)?;
        info!("Created appointment: {}", appointment.id);

        Ok(CreateAppointmentResult { appointment })
    }

    /// Get an appointment by ID
    pub fn get_appointment(
        &self,
        command: GetAppointmentCommand,
    ) -> Result<GetAppointmentResult, AppointmentError> {
        let appointment = self
            .appointment_repository
            .get_appointment(&command.appointment_id)?;
        Ok(GetAppointmentResult { appointment })
    }

    /// List all appointments owned by a user
    pub fn list_appointments(
        &self,
        command: ListAppointmentsCommand,
    ) -> Result<ListAppointmentsResult, AppointmentError> {
        let appointments = self
            .appointment_repository
            .list_appointments_for_user(&command.user_id)?;
        Ok(ListAppointmentsResult { appointments })
    }

    /// Clone a recurring template into one-time instances for the given dates.
    ///
    /// The batch is best-effort: each clone is an independent unit of work, a
    /// failed date is reported in `failed_dates` and earlier clones stay
    /// committed. A date that does not match the template's weekday pattern is
    /// cloned anyway and logged - a data-quality concern, not a hard error.
    pub fn clone_recurring_for_dates(
        &self,
        command: CloneRecurringCommand,
    ) -> Result<CloneRecurringResult, AppointmentError> {
        info!(
            "Cloning template {} for {} dates",
            command.template_appointment_id,
            command.dates.len()
        );

        let _guard = self.connection.write_lock();

        let template = self
            .appointment_repository
            .get_appointment(&command.template_appointment_id)?
            .ok_or_else(|| {
                AppointmentError::NotFound(command.template_appointment_id.clone())
            })?;
        if !template.recurring {
            return Err(AppointmentError::NotRecurring(template.id));
        }

        let mut appointments = Vec::new();
        let mut failed_dates = Vec::new();

        for date in command.dates {
            if !template.occurs_on(date) {
                warn!(
                    "Date {} does not match the weekday pattern of template {}",
                    date, template.id
                );
            }

            let clone = template.clone_for_date(date, Utc::now());
            match self.appointment_repository.store_appointment(&clone) {
                Ok(()) => {
                    info!("Created occurrence {} for {}", clone.id, date);
                    appointments.push(clone);
                }
                Err(e) => {
                    warn!("Failed to persist occurrence for {}: {}", date, e);
                    failed_dates.push(date);
                }
            }
        }

        info!(
            "Cloned {} occurrences from template {} ({} failed)",
            appointments.len(),
            template.id,
            failed_dates.len()
        );

        Ok(CloneRecurringResult {
            appointments,
            failed_dates,
        })
    }

    /// Dates within `[from, to]` on which a recurring template occurs
    pub fn occurrence_dates(
        &self,
        template_appointment_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>, AppointmentError> {
        let template = self
            .appointment_repository
            .get_appointment(template_appointment_id)?
            .ok_or_else(|| AppointmentError::NotFound(template_appointment_id.to_string()))?;
        if !template.recurring {
            return Err(AppointmentError::NotRecurring(template.id));
        }

        let mut dates = Vec::new();
        let mut current = from;
        while current <= to {
            if template.occurs_on(current) {
                dates.push(current);
            }
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(dates)
    }

    /// One-time instances cloned from a recurring template, ordered by date
    pub fn list_clones(
        &self,
        template_appointment_id: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        Ok(self
            .appointment_repository
            .list_clones_of(template_appointment_id)?)
    }

    /// Mark an appointment as canceled
    pub fn cancel_appointment(
        &self,
        command: CancelAppointmentCommand,
    ) -> Result<CancelAppointmentResult, AppointmentError> {
        info!("Canceling appointment: {}", command.appointment_id);

        // the read-modify-write must not interleave with a concurrent share
        // accept, which rewrites the same row's delegation status
        let _guard = self.connection.write_lock();

        let mut appointment = self
            .appointment_repository
            .get_appointment(&command.appointment_id)?
            .ok_or_else(|| AppointmentError::NotFound(command.appointment_id.clone()))?;
        if appointment.completed {
            return Err(AppointmentError::AlreadyCompleted(appointment.id));
        }

        appointment.canceled = true;
        appointment.updated_at = Utc::now();
        self.appointment_repository.update_appointment(&appointment)?;

        Ok(CancelAppointmentResult { appointment })
    }

    /// Delete an appointment and, since an appointment owns its shares,
    /// cascade-delete every share referencing it
    pub fn delete_appointment(&self, appointment_id: &str) -> Result<bool, AppointmentError> {
        info!("Deleting appointment: {}", appointment_id);

        let _guard = self.connection.write_lock();

        let deleted = self.appointment_repository.delete_appointment(appointment_id)?;
        if deleted {
            let shares = self
                .share_repository
                .delete_shares_for_appointment(appointment_id)?;
            info!(
                "Deleted appointment {} and {} associated shares",
                appointment_id, shares
            );
        } else {
            warn!("No appointment found to delete: {}", appointment_id);
        }

        Ok(deleted)
    }
}
