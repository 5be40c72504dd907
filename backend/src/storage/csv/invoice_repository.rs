//! # CSV Invoice Repository
//!
//! Append-only storage for invoices in `invoices.csv`. Settlement appends;
//! the only later mutation is the billing status flip.

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
use crate::domain::models::invoice::{Invoice, InvoiceStatus};
use crate::storage::traits::InvoiceStorage;

const INVOICES_FILE: &str = "invoices.csv";
const INVOICES_HEADER: &str =
    "id,appointment_id,pet_id,date_completed,compensation,is_shared,split_percentage,completed_by_user_id,status,title,created_at\n";

/// CSV record structure for invoices
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InvoiceRecord {
    id: String,
    appointment_id: String,
    pet_id: String,
    date_completed: String,
    compensation: i64,
    is_shared: bool,
    split_percentage: u8,
    completed_by_user_id: String,
    status: String,
    title: String,
    created_at: String,
}

impl From<Invoice> for InvoiceRecord {
    fn from(invoice: Invoice) -> Self {
        InvoiceRecord {
            id: invoice.id,
            appointment_id: invoice.appointment_id,
            pet_id: invoice.pet_id,
            date_completed: invoice.date_completed.format("%Y-%m-%d").to_string(),
            compensation: invoice.compensation,
            is_shared: invoice.is_shared,
            split_percentage: invoice.split_percentage,
            completed_by_user_id: invoice.completed_by_user_id,
            status: invoice.status.as_str().to_string(),
            title: invoice.title,
            created_at: invoice.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<InvoiceRecord> for Invoice {
    type Error = anyhow::Error;

    fn try_from(record: InvoiceRecord) -> Result<Self> {
        let status = InvoiceStatus::from_str(&record.status)
            .map_err(|e| anyhow::anyhow!("Failed to parse invoice status: {}", e))?;

        Ok(Invoice {
            id: record.id,
            appointment_id: record.appointment_id,
            pet_id: record.pet_id,
            date_completed: NaiveDate::parse_from_str(&record.date_completed, "%Y-%m-%d")
                .context("Failed to parse date_completed")?,
            compensation: record.compensation,
            is_shared: record.is_shared,
            split_percentage: record.split_percentage,
            completed_by_user_id: record.completed_by_user_id,
            status,
            title: record.title,
            created_at: DateTime::parse_from_rfc3339(&record.created_at)
                .context("Failed to parse created_at")?
                .with_timezone(&Utc),
        })
    }
}

/// CSV-based invoice repository
#[derive(Clone)]
pub struct InvoiceRepository {
    connection: Arc<CsvConnection>,
}

impl InvoiceRepository {
    /// Create a new CSV invoice repository
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn file_path(&self) -> PathBuf {
        self.connection.file_path(INVOICES_FILE)
    }

    fn ensure_file_exists(&self) -> Result<()> {
        let path = self.file_path();
        if !path.exists() {
            std::fs::write(&path, INVOICES_HEADER)?;
            debug!("Created invoices CSV file: {:?}", path);
        }
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<Invoice>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut invoices = Vec::new();

        for result in csv_reader.deserialize::<InvoiceRecord>() {
            let record = result?;
            match Invoice::try_from(record) {
                Ok(invoice) => invoices.push(invoice),
                Err(e) => {
                    warn!("Failed to parse invoice record: {}. Skipping.", e);
                    continue;
                }
            }
        }

        Ok(invoices)
    }

    fn write_all(&self, invoices: &[Invoice]) -> Result<()> {
        let path = self.file_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(temp_file));
            for invoice in invoices {
                let record = InvoiceRecord::from(invoice.clone());
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

impl InvoiceStorage for InvoiceRepository {
    fn store_invoice(&self, invoice: &Invoice) -> Result<()> {
        self.ensure_file_exists()?;

        let file = OpenOptions::new().append(true).open(self.file_path())?;
        let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(file);
        csv_writer.serialize(InvoiceRecord::from(invoice.clone()))?;
        csv_writer.flush()?;

        debug!("Appended invoice {} for appointment {}", invoice.id, invoice.appointment_id);
        Ok(())
    }

    fn get_invoice(&self, invoice_id: &str) -> Result<Option<Invoice>> {
        let invoices = self.read_all()?;
        Ok(invoices.into_iter().find(|i| i.id == invoice_id))
    }

    fn list_invoices_for_appointment(&self, appointment_id: &str) -> Result<Vec<Invoice>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|i| i.appointment_id == appointment_id)
            .collect())
    }

    fn set_invoice_status(&self, invoice_id: &str, status: InvoiceStatus) -> Result<()> {
        let mut invoices = self.read_all()?;
        let invoice = invoices
            .iter_mut()
            .find(|i| i.id == invoice_id)
            .ok_or_else(|| anyhow::anyhow!("Invoice not found: {}", invoice_id))?;
        invoice.status = status;
        self.write_all(&invoices)
    }
}
