//! Command and result types consumed by the domain services.
//!
//! Each service operation takes an explicit command struct and returns an
//! explicit result struct, validated at the boundary before reaching the core.

pub mod appointment;
pub mod connection;
pub mod settlement;
pub mod share;
