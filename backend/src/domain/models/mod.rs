//! Domain models for the scheduling and revenue-split core.

pub mod appointment;
pub mod connection;
pub mod earning;
pub mod invoice;
pub mod share;

use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a short hex suffix for entity IDs so that records created within
/// the same millisecond still get distinct IDs.
pub(crate) fn random_suffix(len: usize) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos();
    format!("{:x}", now % (16_u128.pow(len as u32)))
        .chars()
        .take(len)
        .collect()
}
