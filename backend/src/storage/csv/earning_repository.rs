//! # CSV Earning Repository
//!
//! Append-only storage for walker earnings in `walker_earnings.csv`.
//! Settlement appends; the only later mutation is the payout status flip.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer, WriterBuilder};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::CsvConnection;
use crate::domain::models::earning::{PayoutStatus, WalkerEarning};
use crate::storage::traits::EarningStorage;

const EARNINGS_FILE: &str = "walker_earnings.csv";
const EARNINGS_HEADER: &str =
    "id,appointment_id,share_id,walker_user_id,pet_id,date_completed,compensation,split_percentage,status,title,created_at\n";

/// CSV record structure for earnings
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EarningRecord {
    id: String,
    appointment_id: String,
    share_id: String,
    walker_user_id: String,
    pet_id: String,
    date_completed: String,
    compensation: i64,
    split_percentage: u8,
    status: String,
    title: String,
    created_at: String,
}

impl From<WalkerEarning> for EarningRecord {
    fn from(earning: WalkerEarning) -> Self {
        EarningRecord {
            id: earning.id,
            appointment_id: earning.appointment_id,
            share_id: earning.share_id,
            walker_user_id: earning.walker_user_id,
            pet_id: earning.pet_id,
            date_completed: earning.date_completed.format("%Y-%m-%d").to_string(),
            compensation: earning.compensation,
            split_percentage: earning.split_percentage,
            status: earning.status.as_str().to_string(),
            title: earning.title,
            created_at: earning.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<EarningRecord> for WalkerEarning {
    type Error = anyhow::Error;

    fn try_from(record: EarningRecord) -> Result<Self> {
        let status = PayoutStatus::from_str(&record.status)
            .map_err(|e| anyhow::anyhow!("Failed to parse payout status: {}", e))?;

        Ok(WalkerEarning {
            id: record.id,
            appointment_id: record.appointment_id,
            share_id: record.share_id,
            walker_user_id: record.walker_user_id,
            pet_id: record.pet_id,
            date_completed: NaiveDate::parse_from_str(&record.date_completed, "%Y-%m-%d")
                .context("Failed to parse date_completed")?,
            compensation: record.compensation,
            split_percentage: record.split_percentage,
            status,
            title: record.title,
            created_at: DateTime::parse_from_rfc3339(&record.created_at)
                .context("Failed to parse created_at")?
                .with_timezone(&Utc),
        })
    }
}

/// CSV-based earning repository
#[derive(Clone)]
pub struct EarningRepository {
    connection: Arc<CsvConnection>,
}

impl EarningRepository {
    /// Create a new CSV earning repository
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn file_path(&self) -> PathBuf {
        self.connection.file_path(EARNINGS_FILE)
    }

    fn ensure_file_exists(&self) -> Result<()> {
        let path = self.file_path();
        if !path.exists() {
            std::fs::write(&path, EARNINGS_HEADER)?;
            debug!("Created earnings CSV file: {:?}", path);
        }
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<WalkerEarning>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut earnings = Vec::new();

        for result in csv_reader.deserialize::<EarningRecord>() {
            let record = result?;
            match WalkerEarning::try_from(record) {
                Ok(earning) => earnings.push(earning),
                Err(e) => {
                    warn!("Failed to parse earning record: {}. Skipping.", e);
                    continue;
                }
            }
        }

        Ok(earnings)
    }

    fn write_all(&self, earnings: &[WalkerEarning]) -> Result<()> {
        let path = self.file_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(temp_file));
            for earning in earnings {
                let record = EarningRecord::from(earning.clone());
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

impl EarningStorage for EarningRepository {
    fn store_earning(&self, earning: &WalkerEarning) -> Result<()> {
        self.ensure_file_exists()?;

        let file = OpenOptions::new().append(true).open(self.file_path())?;
        let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(file);
        csv_writer.serialize(EarningRecord::from(earning.clone()))?;
        csv_writer.flush()?;

        debug!("Appended earning {} for walker {}", earning.id, earning.walker_user_id);
        Ok(())
    }

    fn get_earning(&self, earning_id: &str) -> Result<Option<WalkerEarning>> {
        let earnings = self.read_all()?;
        Ok(earnings.into_iter().find(|e| e.id == earning_id))
    }

    fn list_earnings_for_walker(&self, walker_user_id: &str) -> Result<Vec<WalkerEarning>> {
        let mut earnings: Vec<WalkerEarning> = self
            .read_all()?
            .into_iter()
            .filter(|e| e.walker_user_id == walker_user_id)
            .collect();
        earnings.sort_by(|a, b| b.date_completed.cmp(&a.date_completed));
        Ok(earnings)
    }

    fn set_payout_status(&self, earning_id: &str, status: PayoutStatus) -> Result<()> {
        let mut earnings = self.read_all()?;
        let earning = earnings
            .iter_mut()
            .find(|e| e.id == earning_id)
            .ok_or_else(|| anyhow::anyhow!("Earning not found: {}", earning_id))?;
        earning.status = status;
        self.write_all(&earnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::earning_for;
    use tempfile::TempDir;

    fn setup() -> (EarningRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
        (EarningRepository::new(Arc::new(connection)), temp_dir)
    }

    #[test]
    fn test_store_and_get_earning() {
        let (repo, _temp_dir) = setup();
        let earning = earning_for("appointment::1", "share::1", "user::2", 3000, 60);

        repo.store_earning(&earning).expect("Failed to store earning");

        let retrieved = repo
            .get_earning(&earning.id)
            .expect("Failed to get earning")
            .expect("Earning should exist");
        assert_eq!(retrieved, earning);
    }

    #[test]
    fn test_list_earnings_for_walker() {
        let (repo, _temp_dir) = setup();
        let first = earning_for("appointment::1", "share::1", "user::2", 3000, 60);
        let second = earning_for("appointment::2", "share::2", "user::2", 1500, 50);
        let other = earning_for("appointment::3", "share::3", "user::9", 500, 10);
        repo.store_earning(&first).unwrap();
        repo.store_earning(&second).unwrap();
        repo.store_earning(&other).unwrap();

        let earnings = repo.list_earnings_for_walker("user::2").unwrap();
        assert_eq!(earnings.len(), 2);
        assert!(earnings.iter().all(|e| e.walker_user_id == "user::2"));
    }

    #[test]
    fn test_set_payout_status() {
        let (repo, _temp_dir) = setup();
        let earning = earning_for("appointment::1", "share::1", "user::2", 3000, 60);
        repo.store_earning(&earning).unwrap();

        repo.set_payout_status(&earning.id, PayoutStatus::Paid)
            .expect("Failed to update payout status");

        let retrieved = repo.get_earning(&earning.id).unwrap().unwrap();
        assert_eq!(retrieved.status, PayoutStatus::Paid);
    }
}
