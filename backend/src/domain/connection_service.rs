//! Walker connection requests and the connectedness predicate the share
//! ledger depends on.

use chrono::Utc;
use log::info;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::commands::connection::{
    RequestConnectionCommand, RequestConnectionResult, RespondToConnectionCommand,
    RespondToConnectionResult,
};
use crate::domain::models::connection::{ConnectionStatus, WalkerConnection};
use crate::storage::csv::{ConnectionRepository, CsvConnection};
use crate::storage::traits::WalkerConnectionStorage;

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Cannot request a connection with yourself")]
    SelfConnection,
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),
    #[error("Connection is not pending (status: {0})")]
    NotPending(&'static str),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Service managing walker-to-walker connections
#[derive(Clone)]
pub struct ConnectionService {
    connection: Arc<CsvConnection>,
    connection_repository: ConnectionRepository,
}

impl ConnectionService {
    /// Create a new ConnectionService
    pub fn new(csv_conn: Arc<CsvConnection>) -> Self {
        Self {
            connection_repository: ConnectionRepository::new(csv_conn.clone()),
            connection: csv_conn,
        }
    }

    /// Request a connection with another walker.
    ///
    /// The repository refuses a duplicate request between the same pair in
    /// either direction unless the existing one was declined.
    pub fn request_connection(
        &self,
        command: RequestConnectionCommand,
    ) -> Result<RequestConnectionResult, ConnectionError> {
        info!(
            "Connection request from {} to {}",
            command.requester_user_id, command.recipient_user_id
        );

        if command.requester_user_id == command.recipient_user_id {
            return Err(ConnectionError::SelfConnection);
        }

        let _guard = self.connection.write_lock();

        let now = Utc::now();
        let connection = WalkerConnection {
            id: WalkerConnection::generate_id(now.timestamp_millis() as u64),
            requester_user_id: command.requester_user_id,
            recipient_user_id: command.recipient_user_id,
            status: ConnectionStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.connection_repository.store_connection(&connection)?;

        Ok(RequestConnectionResult { connection })
    }

    /// Accept or decline a pending connection request
    pub fn respond_to_connection(
        &self,
        command: RespondToConnectionCommand,
    ) -> Result<RespondToConnectionResult, ConnectionError> {
        info!(
            "Responding to connection {}: accept={}",
            command.connection_id, command.accept
        );

        let _guard = self.connection.write_lock();

        let mut connection = self
            .connection_repository
            .get_connection(&command.connection_id)?
            .ok_or_else(|| ConnectionError::ConnectionNotFound(command.connection_id.clone()))?;
        if connection.status != ConnectionStatus::Pending {
            return Err(ConnectionError::NotPending(connection.status.as_str()));
        }

        connection.status = if command.accept {
            ConnectionStatus::Accepted
        } else {
            ConnectionStatus::Declined
        };
        connection.updated_at = Utc::now();
        self.connection_repository.update_connection(&connection)?;

        Ok(RespondToConnectionResult { connection })
    }

    /// Whether the two users have an accepted connection
    pub fn are_connected(&self, user_a: &str, user_b: &str) -> Result<bool, ConnectionError> {
        Ok(self.connection_repository.are_connected(user_a, user_b)?)
    }
}
