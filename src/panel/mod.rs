//! Panel access for monitored servers
//!
//! `ServerQuery` is what a polling loop consumes; `PanelClient` is the
//! implementation that scrapes the hosting panel. `ServerRegistry` runs one
//! polling pass over every registered server.

pub mod client;

pub use client::PanelClient;

use crate::error::Result;
use crate::models::{PasswordSource, ServerInfo, ServerStatus};
use async_trait::async_trait;

/// Read access to a server's published name and password
#[async_trait]
pub trait ServerQuery: Send + Sync {
    async fn server_info(&mut self, service_id: &str, source: PasswordSource) -> Result<ServerInfo>;
}

/// A server as configured, with the query that reads it
pub struct MonitoredServer {
    pub name: String,
    pub service_id: String,
    pub password_source: PasswordSource,
    pub color: Option<u32>,
    pub query: Box<dyn ServerQuery>,
}

/// Registry of all monitored servers
pub struct ServerRegistry {
    servers: Vec<MonitoredServer>,
}

impl ServerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            servers: Vec::new(),
        }
    }

    pub fn register(&mut self, server: MonitoredServer) {
        tracing::debug!(
            "Registered server: {} (service {}, password from {:?})",
            server.name,
            server.service_id,
            server.password_source
        );
        self.servers.push(server);
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Read every server once, in registration order.
    ///
    /// A server that fails is logged and reported with an empty name and
    /// password; the others are still read.
    pub async fn poll_all(&mut self) -> Vec<ServerStatus> {
        let mut statuses = Vec::with_capacity(self.servers.len());

        for server in &mut self.servers {
            let info = match server
                .query
                .server_info(&server.service_id, server.password_source)
                .await
            {
                Ok(info) => info,
                Err(e) => {
                    tracing::error!("[{}] Server query failed: {:#}", server.name, e);
                    ServerInfo::default()
                }
            };

            statuses.push(ServerStatus {
                name: server.name.clone(),
                color: server.color,
                server_name: info.name,
                server_password: info.password,
            });
        }

        statuses
    }
}

impl Default for ServerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
