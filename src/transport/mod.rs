//! Transport Module
//!
//! The connection primitive sessions are built on.
//!
//! ## Architecture
//! - [`Transport`] opens channels to `host:port` within a timeout
//! - [`Channel`] is a blocking byte stream (send = `Write`, receive = `Read`)
//! - [`TcpTransport`] is the production implementation; tests plug in
//!   in-memory transports through the same trait

mod tcp;

use std::io::{self, Read, Write};
use std::time::Duration;

use crate::error::Result;

pub use tcp::{TcpChannel, TcpTransport};

/// One open connection to the store
pub trait Channel: Read + Write + Send {
    /// Release the connection. Must tolerate being called on a dead peer.
    fn close(&mut self) -> Result<()>;

    /// Remote endpoint, for logging
    fn peer_addr(&self) -> &str;

    /// Bound the next reads and writes; `None` blocks indefinitely
    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;
}

/// Factory for channels
pub trait Transport: Send + Sync {
    type Channel: Channel;

    /// Open a channel; `None` timeout blocks indefinitely
    fn open(&self, host: &str, port: u16, timeout: Option<Duration>) -> Result<Self::Channel>;
}
