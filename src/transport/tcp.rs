//! TCP Transport
//!
//! Blocking TCP channels with per-call timeouts.

use std::io::{self, BufReader, BufWriter, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::{Channel, Transport};
use crate::error::{MemlinkError, Result};

/// Opens [`TcpChannel`]s
#[derive(Debug, Clone)]
pub struct TcpTransport {
    nodelay: bool,
}

impl TcpTransport {
    pub fn new(nodelay: bool) -> Self {
        Self { nodelay }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Transport for TcpTransport {
    type Channel = TcpChannel;

    fn open(&self, host: &str, port: u16, timeout: Option<Duration>) -> Result<TcpChannel> {
        let connect_err = |reason: String| MemlinkError::Connect {
            host: host.to_string(),
            port,
            reason,
        };

        let addrs: Vec<_> = (host, port)
            .to_socket_addrs()
            .map_err(|e| connect_err(format!("address resolution failed: {}", e)))?
            .collect();

        if addrs.is_empty() {
            return Err(connect_err("host resolved to no addresses".to_string()));
        }

        // Try every resolved address, keep the last failure for the report
        let mut last_err = None;
        for addr in &addrs {
            let attempt = match timeout {
                Some(t) => TcpStream::connect_timeout(addr, t),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    return TcpChannel::new(stream, timeout, self.nodelay)
                        .map_err(|e| connect_err(e.to_string()));
                }
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(connect_err(
            last_err.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }
}

/// A single TCP connection to the store
pub struct TcpChannel {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl TcpChannel {
    /// Wrap a connected stream
    ///
    /// Sets up buffered I/O and configures timeouts
    pub fn new(stream: TcpStream, timeout: Option<Duration>, nodelay: bool) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(nodelay)?;
        stream.set_read_timeout(timeout)?;
        stream.set_write_timeout(timeout)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        })
    }
}

impl Read for TcpChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl Write for TcpChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Channel for TcpChannel {
    fn close(&mut self) -> Result<()> {
        // Pending bytes are meaningless once the channel is abandoned
        let _ = self.writer.flush();

        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    fn set_io_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        self.writer.get_ref().set_write_timeout(timeout)
    }
}
