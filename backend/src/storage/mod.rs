//! Storage layer: abstraction traits plus the CSV implementation.

pub mod csv;
pub mod traits;

pub use traits::{
    AppointmentStorage, EarningStorage, InvoiceStorage, ShareStorage, WalkerConnectionStorage,
};
