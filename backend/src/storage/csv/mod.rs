//! # CSV Storage Module
//!
//! File-based storage implementation for the scheduling core. Each entity
//! lives in a single CSV file under the data directory; mutations replace the
//! file atomically via a temp file, and append-only entities append.
//!
//! ## File layout
//!
//! ```text
//! data/
//! ├── appointments.csv
//! ├── appointment_shares.csv
//! ├── walker_earnings.csv
//! ├── invoices.csv
//! └── walker_connections.csv
//! ```

pub mod connection;
pub mod appointment_repository;
pub mod share_repository;
pub mod earning_repository;
pub mod invoice_repository;
pub mod connection_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use appointment_repository::AppointmentRepository;
pub use share_repository::ShareRepository;
pub use earning_repository::EarningRepository;
pub use invoice_repository::InvoiceRepository;
pub use connection_repository::ConnectionRepository;
