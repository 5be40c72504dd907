//! Domain layer: scheduling, delegation and settlement services.

pub mod commands;
pub mod models;
pub mod split;

pub mod appointment_service;
pub mod connection_service;
pub mod settlement_service;
pub mod share_service;

pub use appointment_service::AppointmentService;
pub use connection_service::{ConnectionError, ConnectionService};
pub use settlement_service::{SettlementError, SettlementService};
pub use share_service::ShareService;
