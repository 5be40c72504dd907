//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work with different
//! storage backends (CSV files today, SQL later) without modification.

use anyhow::Result;
use crate::domain::models::appointment::Appointment;
use crate::domain::models::connection::WalkerConnection;
use crate::domain::models::earning::{PayoutStatus, WalkerEarning};
use crate::domain::models::invoice::{Invoice, InvoiceStatus};
use crate::domain::models::share::AppointmentShare;

/// Interface for appointment storage operations
pub trait AppointmentStorage: Send + Sync {
    /// Store a new appointment
    fn store_appointment(&self, appointment: &Appointment) -> Result<()>;

    /// Retrieve a specific appointment by ID
    fn get_appointment(&self, appointment_id: &str) -> Result<Option<Appointment>>;

    /// List all appointments owned by a user, ordered by creation time
    fn list_appointments_for_user(&self, user_id: &str) -> Result<Vec<Appointment>>;

    /// List the one-time instances cloned from a recurring template
    fn list_clones_of(&self, template_appointment_id: &str) -> Result<Vec<Appointment>>;

    /// Update an existing appointment
    fn update_appointment(&self, appointment: &Appointment) -> Result<()>;

    /// Delete an appointment by ID.
    /// Returns true if the appointment was found and deleted.
    fn delete_appointment(&self, appointment_id: &str) -> Result<bool>;
}

/// Interface for appointment share storage operations
pub trait ShareStorage: Send + Sync {
    /// Store a new share
    fn store_share(&self, share: &AppointmentShare) -> Result<()>;

    /// Retrieve a specific share by ID
    fn get_share(&self, share_id: &str) -> Result<Option<AppointmentShare>>;

    /// The pending or accepted share for an appointment, if any.
    /// At most one such share can exist at a time.
    fn get_active_share_for_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Option<AppointmentShare>>;

    /// The accepted share for an appointment, if any
    fn get_accepted_share_for_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Option<AppointmentShare>>;

    /// List shares where the user is the sharer or the receiver
    fn list_shares_for_user(&self, user_id: &str) -> Result<Vec<AppointmentShare>>;

    /// Update an existing share (status transitions only)
    fn update_share(&self, share: &AppointmentShare) -> Result<()>;

    /// Delete all shares referencing an appointment (cascade on appointment delete).
    /// Returns the number of shares deleted.
    fn delete_shares_for_appointment(&self, appointment_id: &str) -> Result<u32>;
}

/// Interface for walker earning storage operations (append-only)
pub trait EarningStorage: Send + Sync {
    /// Store a new earning
    fn store_earning(&self, earning: &WalkerEarning) -> Result<()>;

    /// Retrieve a specific earning by ID
    fn get_earning(&self, earning_id: &str) -> Result<Option<WalkerEarning>>;

    /// List earnings for a covering walker, most recent first
    fn list_earnings_for_walker(&self, walker_user_id: &str) -> Result<Vec<WalkerEarning>>;

    /// Update the payout status of an earning (the only mutable field)
    fn set_payout_status(&self, earning_id: &str, status: PayoutStatus) -> Result<()>;
}

/// Interface for invoice storage operations (append-only)
pub trait InvoiceStorage: Send + Sync {
    /// Store a new invoice
    fn store_invoice(&self, invoice: &Invoice) -> Result<()>;

    /// Retrieve a specific invoice by ID
    fn get_invoice(&self, invoice_id: &str) -> Result<Option<Invoice>>;

    /// List invoices referencing an appointment
    fn list_invoices_for_appointment(&self, appointment_id: &str) -> Result<Vec<Invoice>>;

    /// Update the billing status of an invoice (the only mutable field)
    fn set_invoice_status(&self, invoice_id: &str, status: InvoiceStatus) -> Result<()>;
}

/// Interface for walker connection storage operations
pub trait WalkerConnectionStorage: Send + Sync {
    /// Store a new connection request
    fn store_connection(&self, connection: &WalkerConnection) -> Result<()>;

    /// Retrieve a specific connection by ID
    fn get_connection(&self, connection_id: &str) -> Result<Option<WalkerConnection>>;

    /// The connection between two users regardless of direction, if any
    fn get_connection_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<WalkerConnection>>;

    /// Update an existing connection
    fn update_connection(&self, connection: &WalkerConnection) -> Result<()>;

    /// Whether the two users have an accepted connection, in either direction
    fn are_connected(&self, user_a: &str, user_b: &str) -> Result<bool>;
}
