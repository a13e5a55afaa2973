//! Configuration for the memlink client
//!
//! Centralized connection settings with sensible defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MemlinkError, Result};

/// Default port of the store's read channel
pub const DEFAULT_READ_PORT: u16 = 11001;

/// Default port of the store's write channel
pub const DEFAULT_WRITE_PORT: u16 = 11002;

/// Connection settings for a [`Session`](crate::Session)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Store host name or IP address
    pub host: String,

    /// Port serving read-class commands (range, count, stat, ...)
    pub read_port: u16,

    /// Port serving write-class commands (insert, delete, push, pop, ...)
    pub write_port: u16,

    // -------------------------------------------------------------------------
    // Socket Configuration
    // -------------------------------------------------------------------------
    /// Budget for one whole request/response exchange, on either channel
    /// (milliseconds, 0 = block)
    pub timeout_ms: u64,

    /// Disable Nagle's algorithm on both channels
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            read_port: DEFAULT_READ_PORT,
            write_port: DEFAULT_WRITE_PORT,
            timeout_ms: 30_000,
            nodelay: true,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Shorthand matching the classic `(host, readport, writeport, timeout)` tuple
    pub fn new(host: impl Into<String>, read_port: u16, write_port: u16, timeout_ms: u64) -> Self {
        Self {
            host: host.into(),
            read_port,
            write_port,
            timeout_ms,
            ..Self::default()
        }
    }

    /// The per-call budget, `None` when calls may block indefinitely
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Reject settings that can never produce a working session
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(MemlinkError::Config("host must not be empty".to_string()));
        }
        if self.read_port == 0 || self.write_port == 0 {
            return Err(MemlinkError::Config(format!(
                "ports must be non-zero (read={}, write={})",
                self.read_port, self.write_port
            )));
        }
        Ok(())
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the store host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the read channel port
    pub fn read_port(mut self, port: u16) -> Self {
        self.config.read_port = port;
        self
    }

    /// Set the write channel port
    pub fn write_port(mut self, port: u16) -> Self {
        self.config.write_port = port;
        self
    }

    /// Set the per-call timeout (in milliseconds)
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
