//! # CSV Walker Connection Repository
//!
//! File-based storage for walker connections in `walker_connections.csv`.
//! Backs the "are these two walkers connected" check made before a share
//! proposal is allowed.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

use super::connection::CsvConnection;
use crate::domain::models::connection::{ConnectionStatus, WalkerConnection};
use crate::storage::traits::WalkerConnectionStorage;

const CONNECTIONS_FILE: &str = "walker_connections.csv";

/// CSV record structure for walker connections
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConnectionRecord {
    id: String,
    requester_user_id: String,
    recipient_user_id: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl From<WalkerConnection> for ConnectionRecord {
    fn from(connection: WalkerConnection) -> Self {
        ConnectionRecord {
            id: connection.id,
            requester_user_id: connection.requester_user_id,
            recipient_user_id: connection.recipient_user_id,
            status: connection.status.as_str().to_string(),
            created_at: connection.created_at.to_rfc3339(),
            updated_at: connection.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ConnectionRecord> for WalkerConnection {
    type Error = anyhow::Error;

    fn try_from(record: ConnectionRecord) -> Result<Self> {
        let status = ConnectionStatus::from_str(&record.status)
            .map_err(|e| anyhow::anyhow!("Failed to parse connection status: {}", e))?;

        Ok(WalkerConnection {
            id: record.id,
            requester_user_id: record.requester_user_id,
            recipient_user_id: record.recipient_user_id,
            status,
            created_at: DateTime::parse_from_rfc3339(&record.created_at)
                .context("Failed to parse created_at")?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&record.updated_at)
                .context("Failed to parse updated_at")?
                .with_timezone(&Utc),
        })
    }
}

/// CSV-based walker connection repository
#[derive(Clone)]
pub struct ConnectionRepository {
    connection: Arc<CsvConnection>,
}

impl ConnectionRepository {
    /// Create a new CSV walker connection repository
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn file_path(&self) -> PathBuf {
        self.connection.file_path(CONNECTIONS_FILE)
    }

    fn read_all(&self) -> Result<Vec<WalkerConnection>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path)?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));
        let mut connections = Vec::new();

        for result in csv_reader.deserialize::<ConnectionRecord>() {
            let record = result?;
            match WalkerConnection::try_from(record) {
                Ok(connection) => connections.push(connection),
                Err(e) => {
                    warn!("Failed to parse connection record: {}. Skipping.", e);
                    continue;
                }
            }
        }

        Ok(connections)
    }

    fn write_all(&self, connections: &[WalkerConnection]) -> Result<()> {
        let path = self.file_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let mut csv_writer = Writer::from_writer(BufWriter::new(temp_file));
            for connection in connections {
                let record = ConnectionRecord::from(connection.clone());
                csv_writer.serialize(record)?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        debug!(
            "Successfully wrote {} connections to {:?}",
            connections.len(),
            path
        );
        Ok(())
    }
}

impl WalkerConnectionStorage for ConnectionRepository {
    fn store_connection(&self, connection: &WalkerConnection) -> Result<()> {
        let mut connections = self.read_all()?;
        if connections.iter().any(|c| c.id == connection.id) {
            return Err(anyhow::anyhow!(
                "Connection already exists: {}",
                connection.id
            ));
        }
        if connections.iter().any(|c| {
            c.links(&connection.requester_user_id, &connection.recipient_user_id)
                && c.status != ConnectionStatus::Declined
        }) {
            return Err(anyhow::anyhow!(
                "Connection between {} and {} already exists",
                connection.requester_user_id,
                connection.recipient_user_id
            ));
        }
        connections.push(connection.clone());
        self.write_all(&connections)
    }

    fn get_connection(&self, connection_id: &str) -> Result<Option<WalkerConnection>> {
        let connections = self.read_all()?;
        Ok(connections.into_iter().find(|c| c.id == connection_id))
    }

    fn get_connection_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<WalkerConnection>> {
        let connections = self.read_all()?;
        Ok(connections.into_iter().find(|c| c.links(user_a, user_b)))
    }

    fn update_connection(&self, connection: &WalkerConnection) -> Result<()> {
        let mut connections = self.read_all()?;
        let position = connections
            .iter()
            .position(|c| c.id == connection.id)
            .ok_or_else(|| anyhow::anyhow!("Connection not found: {}", connection.id))?;
        connections[position] = connection.clone();
        self.write_all(&connections)
    }

    fn are_connected(&self, user_a: &str, user_b: &str) -> Result<bool> {
        let connections = self.read_all()?;
        Ok(connections
            .iter()
            .any(|c| c.links(user_a, user_b) && c.status == ConnectionStatus::Accepted))
    }
}
