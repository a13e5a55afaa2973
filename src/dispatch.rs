//! Command Dispatch
//!
//! A [`ChannelSlot`] owns the channel for one role (read or write) and runs
//! request/response exchanges on it one at a time.
//!
//! ## Slot States
//! ```text
//!  Connected ──fault──▶ Discarded ──next call──▶ Connected
//!      │                    │
//!      └──────close()───────┴──────────▶ Closed ──reopen()──▶ Connected
//! ```
//! - A fault (timeout, lost connection, framing mismatch) leaves the
//!   channel's request/response pairing unknown, so it is closed and never
//!   reused. The next call on the slot opens a fresh channel.
//! - A closed slot rejects calls without touching any channel.
//! - The configured timeout bounds the whole exchange, not each syscall.

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::{MemlinkError, Result};
use crate::protocol::{read_response, write_command, ChannelRole, Command, Response};
use crate::transport::{Channel, Transport};

enum SlotState<C> {
    Connected(C),
    Discarded,
    Closed,
}

/// Serialized access to one channel
pub struct ChannelSlot<C> {
    role: ChannelRole,
    port: u16,
    state: Mutex<SlotState<C>>,
}

impl<C: Channel> ChannelSlot<C> {
    /// Wrap an already open channel
    pub fn new(role: ChannelRole, port: u16, channel: C) -> Self {
        Self {
            role,
            port,
            state: Mutex::new(SlotState::Connected(channel)),
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(*self.state.lock(), SlotState::Closed)
    }

    /// Send `command` and hand the response to `decode`
    ///
    /// Holds the slot for the whole exchange, including decoding, so a
    /// second caller on the same role waits instead of interleaving.
    pub fn call<T, R, F>(
        &self,
        transport: &T,
        host: &str,
        timeout: Option<Duration>,
        command: &Command,
        decode: F,
    ) -> Result<R>
    where
        T: Transport<Channel = C>,
        F: FnOnce(Response) -> Result<R>,
    {
        let mut state = self.state.lock();

        if let SlotState::Closed = *state {
            return Err(MemlinkError::ClosedSession);
        }

        if let SlotState::Discarded = *state {
            tracing::debug!("Reopening {} channel to {}:{}", self.role, host, self.port);
            let channel = transport
                .open(host, self.port, timeout)
                .map_err(|e| MemlinkError::ConnectionLost(e.to_string()))?;
            *state = SlotState::Connected(channel);
        }

        let SlotState::Connected(channel) = &mut *state else {
            return Err(MemlinkError::ConnectionLost(format!(
                "{} channel unavailable",
                self.role
            )));
        };

        tracing::trace!(
            "Dispatching {:?} on {} channel ({})",
            command.command_type(),
            self.role,
            channel.peer_addr()
        );

        let mut io = Deadline::new(channel, timeout);
        let outcome = write_command(&mut io, command)
            .and_then(|()| read_response(&mut io))
            .map_err(expired_to_timeout)
            .and_then(decode);

        if let Err(ref e) = outcome {
            if e.desynchronizes_channel() {
                tracing::warn!(
                    "Discarding {} channel after {:?}: {}",
                    self.role,
                    command.command_type(),
                    e
                );
                if let SlotState::Connected(mut channel) =
                    std::mem::replace(&mut *state, SlotState::Discarded)
                {
                    let _ = channel.close();
                }
            }
        }

        outcome
    }

    /// Release the channel and refuse further calls until reopened
    ///
    /// Returns false when the slot was already closed.
    pub fn close(&self) -> bool {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, SlotState::Closed) {
            SlotState::Connected(mut channel) => {
                if let Err(e) = channel.close() {
                    tracing::debug!("Error closing {} channel: {}", self.role, e);
                }
                true
            }
            SlotState::Discarded => true,
            SlotState::Closed => false,
        }
    }

    /// Make sure a live channel is held
    pub fn reopen<T>(&self, transport: &T, host: &str, timeout: Option<Duration>) -> Result<()>
    where
        T: Transport<Channel = C>,
    {
        let mut state = self.state.lock();
        if let SlotState::Connected(_) = *state {
            return Ok(());
        }
        let channel = transport.open(host, self.port, timeout)?;
        *state = SlotState::Connected(channel);
        Ok(())
    }
}

/// Runs reads and writes against one deadline
///
/// Before every read or write the channel's timeout is narrowed to what is
/// left of the call's budget, so a peer trickling bytes cannot stretch a
/// call past it.
struct Deadline<'a, C> {
    channel: &'a mut C,
    expires: Option<Instant>,
}

impl<'a, C: Channel> Deadline<'a, C> {
    fn new(channel: &'a mut C, timeout: Option<Duration>) -> Self {
        Self {
            channel,
            expires: timeout.map(|t| Instant::now() + t),
        }
    }

    fn arm(&mut self) -> io::Result<()> {
        let Some(expires) = self.expires else {
            return Ok(());
        };
        let remaining = expires.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "call deadline exceeded",
            ));
        }
        self.channel.set_io_timeout(Some(remaining))
    }
}

impl<C: Channel> Read for Deadline<'_, C> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.arm()?;
        self.channel.read(buf)
    }
}

impl<C: Channel> Write for Deadline<'_, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.arm()?;
        self.channel.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.arm()?;
        self.channel.flush()
    }
}

fn expired_to_timeout(e: MemlinkError) -> MemlinkError {
    match e {
        MemlinkError::Io(ref io_err)
            if matches!(
                io_err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ) =>
        {
            MemlinkError::Timeout
        }
        other => other,
    }
}
