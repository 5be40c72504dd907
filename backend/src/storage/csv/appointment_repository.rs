//! # CSV Appointment Repository
//!
//! File-based appointment storage. All appointments (recurring templates and
//! one-time instances) live in a single `appointments.csv` under the data
//! directory, rewritten atomically via a temp file on every mutation.
//!
//! ## CSV Format
//!
//! ```csv
//! id,user_id,pet_id,recurring,appointment_date,sunday,monday,tuesday,wednesday,thursday,friday,saturday,start_time,end_time,duration_minutes,price,completed,canceled,delegation_status,cloned_from_appointment_id,created_at,updated_at
//! appointment::1700000000000-a3f1,user::1,pet::1,false,2026-09-01,false,false,false,false,false,false,false,09:00,09:30,30,5000,false,false,none,,2026-08-01T10:00:00+00:00,2026-08-01T10:00:00+00:00
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use csv::{Reader, Writer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::CsvConnection;
use crate::domain::models::appointment::{Appointment, DelegationStatus, WeekdayFlags};
use crate::storage::traits::AppointmentStorage;

const APPOINTMENTS_FILE: &str = "appointments.csv";

/// CSV record structure for appointments
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppointmentRecord {
    id: String,
    user_id: String,
    pet_id: String,
    recurring: bool,
    appointment_date: String,
    sunday: bool,
    monday: bool,
    tuesday: bool,
    wednesday: bool,
    thursday: bool,
    friday: bool,
    saturday: bool,
    start_time: String,
    end_time: String,
    duration_minutes: u32,
    price: i64,
    completed: bool,
    canceled: bool,
    delegation_status: String,
    cloned_from_appointment_id: String,
    created_at: String,
    updated_at: String,
}

impl From<Appointment> for AppointmentRecord {
    fn from(appointment: Appointment) -> Self {
        AppointmentRecord {
            id: appointment.id,
            user_id: appointment.user_id,
            pet_id: appointment.pet_id,
            recurring: appointment.recurring,
            appointment_date: appointment
                .appointment_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            sunday: appointment.weekdays.sunday,
            monday: appointment.weekdays.monday,
            tuesday: appointment.weekdays.tuesday,
            wednesday: appointment.weekdays.wednesday,
            thursday: appointment.weekdays.thursday,
            friday: appointment.weekdays.friday,
            saturday: appointment.weekdays.saturday,
            start_time: appointment.start_time.format("%H:%M").to_string(),
            end_time: appointment.end_time.format("%H:%M").to_string(),
            duration_minutes: appointment.duration_minutes,
            price: appointment.price,
            completed: appointment.completed,
            canceled: appointment.canceled,
            delegation_status: appointment.delegation_status.as_str().to_string(),
            cloned_from_appointment_id: appointment
                .cloned_from_appointment_id
                .unwrap_or_default(),
            created_at: appointment.created_at.to_rfc3339(),
            updated_at: appointment.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<AppointmentRecord> for Appointment {
    type Error = anyhow::Error;

    fn try_from(record: AppointmentRecord) -> Result<Self> {
        let appointment_date = if record.appointment_date.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(&record.appointment_date, "%Y-%m-%d")
                    .context("Failed to parse appointment date")?,
            )
        };
        let delegation_status = DelegationStatus::from_str(&record.delegation_status)
            .map_err(|e| anyhow::anyhow!("Failed to parse delegation status: {}", e))?;

        Ok(Appointment {
            id: record.id,
            user_id: record.user_id,
            pet_id: record.pet_id,
            recurring: record.recurring,
            appointment_date,
            weekdays: WeekdayFlags {
                sunday: record.sunday,
                monday: record.monday,
                tuesday: record.tuesday,
                wednesday: record.wednesday,
                thursday: record.thursday,
                friday: record.friday,
                saturday: record.saturday,
            },
            start_time: NaiveTime::parse_from_str(&record.start_time, "%H:%M")
                .context("Failed to parse start time")?,
            end_time: NaiveTime::parse_from_str(&record.end_time, "%H:%M")
                .context("Failed to parse end time")?,
            duration_minutes: record.duration_minutes,
            price: record.price,
            completed: record.completed,
            canceled: record.canceled,
            delegation_status,
            cloned_from_appointment_id: if record.cloned_from_appointment_id.is_empty() {
                None
            } else {
                Some(record.cloned_from_appointment_id)
            },
            created_at: DateTime::parse_from_rfc3339(&record.created_at)
                .context("Failed to parse created_at")?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&record.updated_at)
                .context("Failed to parse updated_at")?
                .with_timezone(&Utc),
        })
    }
}

/// CSV-based appointment repository
#[derive(Clone)]
pub struct AppointmentRepository {
    connection: Arc<CsvConnection>,
}

impl AppointmentRepository {
    /// Create a new CSV appointment repository
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn file_path(&self) -> PathBuf {
        self.connection.file_path(APPOINTMENTS_FILE)
    }

    /// Read all appointments from the CSV file
    fn read_all(&self) -> Result<Vec<Appointment>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut appointments = Vec::new();

        for result in csv_reader.deserialize::<AppointmentRecord>() {
            let record = result?;
            match Appointment::try_from(record) {
                Ok(appointment) => appointments.push(appointment),
                Err(e) => {
                    warn!("Failed to parse appointment record: {}. Skipping.", e);
                    continue;
                }
            }
        }

        Ok(appointments)
    }

    /// Write all appointments to the CSV file (atomic temp-file replace)
    fn write_all(&self, appointments: &[Appointment]) -> Result<()> {
        let path = self.file_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(temp_file));
            for appointment in appointments {
                let record = AppointmentRecord::from(appointment.clone());
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        debug!(
            "Successfully wrote {} appointments to {:?}",
            appointments.len(),
            path
        );
        Ok(())
    }
}

impl AppointmentStorage for AppointmentRepository {
    fn store_appointment(&self, appointment: &Appointment) -> Result<()> {
        let mut appointments = self.read_all()?;
        if appointments.iter().any(|a| a.id == appointment.id) {
            return Err(anyhow::anyhow!(
                "Appointment already exists: {}",
                appointment.id
            ));
        }
        appointments.push(appointment.clone());
        self.write_all(&appointments)
    }

    fn get_appointment(&self, appointment_id: &str) -> Result<Option<Appointment>> {
        let appointments = self.read_all()?;
        Ok(appointments.into_iter().find(|a| a.id == appointment_id))
    }

    fn list_appointments_for_user(&self, user_id: &str) -> Result<Vec<Appointment>> {
        let mut appointments: Vec<Appointment> = self
            .read_all()?
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .collect();
        appointments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(appointments)
    }

    fn list_clones_of(&self, template_appointment_id: &str) -> Result<Vec<Appointment>> {
        let mut clones: Vec<Appointment> = self
            .read_all()?
            .into_iter()
            .filter(|a| {
                a.cloned_from_appointment_id.as_deref() == Some(template_appointment_id)
            })
            .collect();
        clones.sort_by(|a, b| a.appointment_date.cmp(&b.appointment_date));
        Ok(clones)
    }

    fn update_appointment(&self, appointment: &Appointment) -> Result<()> {
        let mut appointments = self.read_all()?;
        let position = appointments
            .iter()
            .position(|a| a.id == appointment.id)
            .ok_or_else(|| anyhow::anyhow!("Appointment not found: {}", appointment.id))?;
        appointments[position] = appointment.clone();
        self.write_all(&appointments)
    }

    fn delete_appointment(&self, appointment_id: &str) -> Result<bool> {
        let mut appointments = self.read_all()?;
        let before = appointments.len();
        appointments.retain(|a| a.id != appointment_id);
        if appointments.len() == before {
            return Ok(false);
        }
        self.write_all(&appointments)?;
        Ok(true)
    }
}
