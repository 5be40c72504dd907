//! # CSV Share Repository
//!
//! File-based storage for appointment shares in `appointment_shares.csv`,
//! rewritten atomically via a temp file on every mutation.
//!
//! `store_share` refuses to insert a second active (pending or accepted)
//! share for the same appointment. Callers serialize their check-then-act
//! sequences with the connection write lock; the re-check here is the
//! storage-layer backstop equivalent to a uniqueness constraint over
//! (appointment id, active-status).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::CsvConnection;
use crate::domain::models::share::{AppointmentShare, ShareStatus};
use crate::storage::traits::ShareStorage;

const SHARES_FILE: &str = "appointment_shares.csv";

/// CSV record structure for shares
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ShareRecord {
    id: String,
    appointment_id: String,
    sharing_user_id: String,
    receiving_user_id: String,
    covering_walker_percentage: u8,
    status: String,
    recurring_share: bool,
    created_at: String,
    updated_at: String,
}

impl From<AppointmentShare> for ShareRecord {
    fn from(share: AppointmentShare) -> Self {
        ShareRecord {
            id: share.id,
            appointment_id: share.appointment_id,
            sharing_user_id: share.sharing_user_id,
            receiving_user_id: share.receiving_user_id,
            covering_walker_percentage: share.covering_walker_percentage,
            status: share.status.as_str().to_string(),
            recurring_share: share.recurring_share,
            created_at: share.created_at.to_rfc3339(),
            updated_at: share.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ShareRecord> for AppointmentShare {
    type Error = anyhow::Error;

    fn try_from(record: ShareRecord) -> Result<Self> {
        let status = ShareStatus::from_str(&record.status)
            .map_err(|e| anyhow::anyhow!("Failed to parse share status: {}", e))?;

        Ok(AppointmentShare {
            id: record.id,
            appointment_id: record.appointment_id,
            sharing_user_id: record.sharing_user_id,
            receiving_user_id: record.receiving_user_id,
            covering_walker_percentage: record.covering_walker_percentage,
            status,
            recurring_share: record.recurring_share,
            created_at: DateTime::parse_from_rfc3339(&record.created_at)
                .context("Failed to parse created_at")?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&record.updated_at)
                .context("Failed to parse updated_at")?
                .with_timezone(&Utc),
        })
    }
}

/// CSV-based share repository
#[derive(Clone)]
pub struct ShareRepository {
    connection: Arc<CsvConnection>,
}

impl ShareRepository {
    /// Create a new CSV share repository
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn file_path(&self) -> PathBuf {
        self.connection.file_path(SHARES_FILE)
    }

    fn read_all(&self) -> Result<Vec<AppointmentShare>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut shares = Vec::new();

        for result in csv_reader.deserialize::<ShareRecord>() {
            let record = result?;
            match AppointmentShare::try_from(record) {
                Ok(share) => shares.push(share),
                Err(e) => {
                    warn!("Failed to parse share record: {}. Skipping.", e);
                    continue;
                }
            }
        }

        Ok(shares)
    }

    fn write_all(&self, shares: &[AppointmentShare]) -> Result<()> {
        let path = self.file_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(temp_file));
            for share in shares {
                let record = ShareRecord::from(share.clone());
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        debug!("Successfully wrote {} shares to {:?}", shares.len(), path);
        Ok(())
    }
}

impl ShareStorage for ShareRepository {
    fn store_share(&self, share: &AppointmentShare) -> Result<()> {
        let mut shares = self.read_all()?;
        if shares.iter().any(|s| s.id == share.id) {
            return Err(anyhow::anyhow!("Share already exists: {}", share.id));
        }
        if share.status.is_active()
            && shares
                .iter()
                .any(|s| s.appointment_id == share.appointment_id && s.status.is_active())
        {
            return Err(anyhow::anyhow!(
                "Active share already exists for appointment: {}",
                share.appointment_id
            ));
        }
        shares.push(share.clone());
        self.write_all(&shares)
    }

    fn get_share(&self, share_id: &str) -> Result<Option<AppointmentShare>> {
        let shares = self.read_all()?;
        Ok(shares.into_iter().find(|s| s.id == share_id))
    }

    fn get_active_share_for_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Option<AppointmentShare>> {
        let shares = self.read_all()?;
        Ok(shares
            .into_iter()
            .find(|s| s.appointment_id == appointment_id && s.status.is_active()))
    }

    fn get_accepted_share_for_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Option<AppointmentShare>> {
        let shares = self.read_all()?;
        Ok(shares
            .into_iter()
            .find(|s| s.appointment_id == appointment_id && s.status == ShareStatus::Accepted))
    }

    fn list_shares_for_user(&self, user_id: &str) -> Result<Vec<AppointmentShare>> {
        let mut shares: Vec<AppointmentShare> = self
            .read_all()?
            .into_iter()
            .filter(|s| s.sharing_user_id == user_id || s.receiving_user_id == user_id)
            .collect();
        shares.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(shares)
    }

    fn update_share(&self, share: &AppointmentShare) -> Result<()> {
        let mut shares = self.read_all()?;
        let position = shares
            .iter()
            .position(|s| s.id == share.id)
            .ok_or_else(|| anyhow::anyhow!("Share not found: {}", share.id))?;
        shares[position] = share.clone();
        self.write_all(&shares)
    }

    fn delete_shares_for_appointment(&self, appointment_id: &str) -> Result<u32> {
        let mut shares = self.read_all()?;
        let before = shares.len();
        shares.retain(|s| s.appointment_id != appointment_id);
        let deleted = (before - shares.len()) as u32;
        if deleted > 0 {
            self.write_all(&shares)?;
        }
        Ok(deleted)
    }
}
