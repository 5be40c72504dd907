//! Command and result types for walker connections.
use crate::domain::models::connection::WalkerConnection;

#[derive(Debug, Clone)]
pub struct RequestConnectionCommand {
    pub requester_user_id: String,
    pub recipient_user_id: String,
}

#[derive(Debug, Clone)]
pub struct RequestConnectionResult {
    pub connection: WalkerConnection,
}

#[derive(Debug, Clone)]
pub struct RespondToConnectionCommand {
    pub connection_id: String,
    pub accept: bool,
}

#[derive(Debug, Clone)]
pub struct RespondToConnectionResult {
    pub connection: WalkerConnection,
}
