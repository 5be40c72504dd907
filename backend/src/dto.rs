//! Conversions from domain models to the shared DTO types.
//!
//! Internal status enums expand into the flat string/boolean shapes the DTO
//! crate exposes; dates and times become formatted strings.

use shared::{
    Appointment as AppointmentDto, AppointmentShare as AppointmentShareDto,
    Invoice as InvoiceDto, WalkerConnection as WalkerConnectionDto,
    WalkerEarning as WalkerEarningDto,
};

use crate::domain::models::appointment::Appointment;
use crate::domain::models::connection::WalkerConnection;
use crate::domain::models::earning::{PayoutStatus, WalkerEarning};
use crate::domain::models::invoice::{Invoice, InvoiceStatus};
use crate::domain::models::share::AppointmentShare;

impl From<Appointment> for AppointmentDto {
    fn from(appointment: Appointment) -> Self {
        AppointmentDto {
            id: appointment.id,
            user_id: appointment.user_id,
            pet_id: appointment.pet_id,
            recurring: appointment.recurring,
            appointment_date: appointment.appointment_date.map(|d| d.to_string()),
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
            cloned_from_appointment_id: appointment.cloned_from_appointment_id,
            created_at: appointment.created_at.to_rfc3339(),
            updated_at: appointment.updated_at.to_rfc3339(),
        }
    }
}

impl From<AppointmentShare> for AppointmentShareDto {
    fn from(share: AppointmentShare) -> Self {
        AppointmentShareDto {
            id: share.id.clone(),
            appointment_id: share.appointment_id.clone(),
            sharing_user_id: share.sharing_user_id.clone(),
            receiving_user_id: share.receiving_user_id.clone(),
            covering_walker_percentage: share.covering_walker_percentage,
            original_walker_percentage: share.original_walker_percentage(),
            status: share.status.as_str().to_string(),
            recurring_share: share.recurring_share,
            created_at: share.created_at.to_rfc3339(),
            updated_at: share.updated_at.to_rfc3339(),
        }
    }
}

impl From<WalkerEarning> for WalkerEarningDto {
    fn from(earning: WalkerEarning) -> Self {
        WalkerEarningDto {
            id: earning.id,
            appointment_id: earning.appointment_id,
            share_id: earning.share_id,
            walker_user_id: earning.walker_user_id,
            pet_id: earning.pet_id,
            date_completed: earning.date_completed.to_string(),
            compensation: earning.compensation,
            split_percentage: earning.split_percentage,
            paid: earning.status == PayoutStatus::Paid,
            pending: earning.status == PayoutStatus::Pending,
            title: earning.title,
            created_at: earning.created_at.to_rfc3339(),
        }
    }
}

impl From<Invoice> for InvoiceDto {
    fn from(invoice: Invoice) -> Self {
        InvoiceDto {
            id: invoice.id,
            appointment_id: invoice.appointment_id,
            pet_id: invoice.pet_id,
            date_completed: invoice.date_completed.to_string(),
            compensation: invoice.compensation,
            is_shared: invoice.is_shared,
            split_percentage: invoice.split_percentage,
            completed_by_user_id: invoice.completed_by_user_id,
            paid: invoice.status == InvoiceStatus::Paid,
            pending: invoice.status == InvoiceStatus::Pending,
            cancelled: invoice.status == InvoiceStatus::Cancelled,
            title: invoice.title,
            created_at: invoice.created_at.to_rfc3339(),
        }
    }
}

impl From<WalkerConnection> for WalkerConnectionDto {
    fn from(connection: WalkerConnection) -> Self {
        WalkerConnectionDto {
            id: connection.id,
            requester_user_id: connection.requester_user_id,
            recipient_user_id: connection.recipient_user_id,
            status: connection.status.as_str().to_string(),
            created_at: connection.created_at.to_rfc3339(),
            updated_at: connection.updated_at.to_rfc3339(),
        }
    }
}
