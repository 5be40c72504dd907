//! Settlement: turns a finished walk into money records.
//!
//! When the appointment was covered through an accepted share, settlement
//! splits the total compensation and writes a `WalkerEarning` for the covering
//! walker plus an `Invoice` for the original owner's remainder. When it was
//! not shared, the full amount lands on a single invoice. Either way the
//! appointment is marked completed, and settling it again is refused.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::domain::commands::settlement::{SettleAppointmentCommand, SettleAppointmentResult};
use crate::domain::models::appointment::DelegationStatus;
use crate::domain::models::earning::{PayoutStatus, WalkerEarning};
use crate::domain::models::invoice::{Invoice, InvoiceStatus};
use crate::domain::models::share::ShareStatus;
use crate::domain::split::calculate_split;
use crate::storage::csv::{
    AppointmentRepository, CsvConnection, EarningRepository, InvoiceRepository, ShareRepository,
};
use crate::storage::traits::{AppointmentStorage, EarningStorage, InvoiceStorage, ShareStorage};

#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("Appointment not found: {0}")]
    AppointmentNotFound(String),
    #[error("Appointment has already been settled")]
    AlreadyCompleted,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Service materializing settlement records for completed appointments
#[derive(Clone)]
pub struct SettlementService {
    connection: Arc<CsvConnection>,
    appointment_repository: AppointmentRepository,
    share_repository: ShareRepository,
    earning_repository: EarningRepository,
    invoice_repository: InvoiceRepository,
}

impl SettlementService {
    /// Create a new SettlementService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            appointment_repository: AppointmentRepository::new(csv_conn.clone()),
            share_repository: ShareRepository::new(csv_conn.clone()),
            earning_repository: EarningRepository::new(csv_conn.clone()),
            invoice_repository: InvoiceRepository::new(csv_conn.clone()),
            connection: csv_conn,
        }
    }

    /// Settle a completed walk.
    ///
    /// Runs the whole read-split-write sequence under the write lock so a
    /// double invocation cannot produce duplicate money records: the second
    /// caller sees `completed` already set and gets `AlreadyCompleted`.
    /// A share still pending at this point is canceled so it can never be
    /// accepted against the settled appointment.
    pub fn settle_appointment(
        &self,
        command: SettleAppointmentCommand,
    ) -> Result<SettleAppointmentResult, SettlementError> {
        info!(
            "Settling appointment {} for {} cents (reported by {})",
            command.appointment_id, command.total_compensation, command.completed_by_user_id
        );

        let _guard = self.connection.write_lock();

        let mut appointment = self
            .appointment_repository
            .get_appointment(&command.appointment_id)?
            .ok_or_else(|| SettlementError::AppointmentNotFound(command.appointment_id.clone()))?;
        if appointment.completed {
            return Err(SettlementError::AlreadyCompleted);
        }

        let now = Utc::now();

        // a proposal nobody answered dies with the walk; a share left pending
        // forever would keep blocking the appointment and could still be
        // accepted after the money records exist
        if let Some(mut share) = self
            .share_repository
            .get_active_share_for_appointment(&appointment.id)?
        {
            if share.status == ShareStatus::Pending {
                warn!("Canceling unanswered share {} at settlement", share.id);
                share.status = ShareStatus::Canceled;
                share.updated_at = now;
                self.share_repository.update_share(&share)?;
            }
        }

        let accepted_share = self
            .share_repository
            .get_accepted_share_for_appointment(&appointment.id)?;

        let (earning, invoice) = match accepted_share {
            Some(share) => {
                let split = calculate_split(
                    command.total_compensation,
                    share.covering_walker_percentage,
                );
                info!(
                    "Splitting {} cents: {} to covering walker {}, {} retained",
                    command.total_compensation,
                    split.covering,
                    share.receiving_user_id,
                    split.original
                );

                let earning = WalkerEarning {
                    id: WalkerEarning::generate_id(now.timestamp_millis() as u64),
                    appointment_id: appointment.id.clone(),
                    share_id: share.id.clone(),
                    walker_user_id: share.receiving_user_id.clone(),
                    pet_id: appointment.pet_id.clone(),
                    date_completed: command.date_completed,
                    compensation: split.covering,
                    split_percentage: share.covering_walker_percentage,
                    status: PayoutStatus::Pending,
                    title: format!("Covered walk on {}", command.date_completed),
                    created_at: now,
                };
                let invoice = Invoice {
                    id: Invoice::generate_id(now.timestamp_millis() as u64),
                    appointment_id: appointment.id.clone(),
                    pet_id: appointment.pet_id.clone(),
                    date_completed: command.date_completed,
                    compensation: split.original,
                    is_shared: true,
                    split_percentage: share.original_walker_percentage(),
                    completed_by_user_id: share.receiving_user_id.clone(),
                    status: InvoiceStatus::Pending,
                    title: format!("Walk on {}", command.date_completed),
                    created_at: now,
                };
                appointment.delegation_status = DelegationStatus::Completed;
                (Some(earning), invoice)
            }
            None => {
                let invoice = Invoice {
                    id: Invoice::generate_id(now.timestamp_millis() as u64),
                    appointment_id: appointment.id.clone(),
                    pet_id: appointment.pet_id.clone(),
                    date_completed: command.date_completed,
                    compensation: command.total_compensation,
                    is_shared: false,
                    split_percentage: 100,
                    // without a share the owner walked their own appointment
                    completed_by_user_id: appointment.user_id.clone(),
                    status: InvoiceStatus::Pending,
                    title: format!("Walk on {}", command.date_completed),
                    created_at: now,
                };
                (None, invoice)
            }
        };

        if let Some(ref earning) = earning {
            self.earning_repository.store_earning(earning)?;
        }
        self.invoice_repository.store_invoice(&invoice)?;

        appointment.completed = true;
        appointment.updated_at = now;
        self.appointment_repository.update_appointment(&appointment)?;

        info!(
            "Settled appointment {} (invoice {}, earning: {})",
            appointment.id,
            invoice.id,
            earning.as_ref().map(|e| e.id.as_str()).unwrap_or("none")
        );
        Ok(SettleAppointmentResult {
            earning,
            invoice,
            appointment,
        })
    }

    /// Mark an earning as paid out
    pub fn mark_earning_paid(&self, earning_id: &str) -> Result<(), SettlementError> {
        info!("Marking earning {} as paid", earning_id);
        let _guard = self.connection.write_lock();
        self.earning_repository
            .set_payout_status(earning_id, PayoutStatus::Paid)?;
        Ok(())
    }

    /// Update the billing status of an invoice
    pub fn set_invoice_status(
        &self,
        invoice_id: &str,
        status: InvoiceStatus,
    ) -> Result<(), SettlementError> {
        info!("Setting invoice {} to {}", invoice_id, status.as_str());
        let _guard = self.connection.write_lock();
        self.invoice_repository.set_invoice_status(invoice_id, status)?;
        Ok(())
    }

    /// List a covering walker's earnings, most recent first
    pub fn list_earnings_for_walker(
        &self,
        walker_user_id: &str,
    ) -> Result<Vec<WalkerEarning>, SettlementError> {
        Ok(self.earning_repository.list_earnings_for_walker(walker_user_id)?)
    }

    /// List the invoices referencing an appointment
    pub fn list_invoices_for_appointment(
        &self,
        appointment_id: &str,
    ) -> Result<Vec<Invoice>, SettlementError> {
        Ok(self
            .invoice_repository
            .list_invoices_for_appointment(appointment_id)?)
    }
}
