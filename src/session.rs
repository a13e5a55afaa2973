//! Session Module
//!
//! A live connection pair to one store instance and the full command surface.
//!
//! ## Responsibilities
//! - Open both channels up front, or fail without leaving either open
//! - Route every command to the channel its class requires
//! - Turn responses into a [`Status`] or a [`Reply`]
//! - Close, reconnect and destroy
//!
//! ## Concurrency Model: one in-flight call per channel
//!
//! - Read-class commands (ping, dump, stat, stat_sys, range, count) use the
//!   read channel; everything that mutates uses the write channel
//! - Each channel sits behind its own slot mutex, so a range on one thread
//!   never waits for an insert on another
//! - Calls on the same channel queue up; the protocol does not pipeline

use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::dispatch::ChannelSlot;
use crate::error::{MemlinkError, Result};
use crate::protocol::{ChannelRole, Command, ListKind, RangeKind, Status, ValueType, POS_AUTO};
use crate::results::{
    decode_count, decode_items, decode_stat, decode_stat_sys, Count, Reply, ResultSet, Stat,
    StatSys,
};
use crate::transport::{Channel, TcpTransport, Transport};

/// A connection pair (read + write) to one store
pub struct Session<T: Transport = TcpTransport> {
    /// Connection settings
    config: ClientConfig,

    /// Opens channels, initially and after faults
    transport: T,

    /// Query traffic
    read: ChannelSlot<T::Channel>,

    /// Mutation traffic
    write: ChannelSlot<T::Channel>,

    /// Set once by destroy(), never cleared
    destroyed: AtomicBool,
}

impl Session<TcpTransport> {
    /// Connect to the store over TCP
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let transport = TcpTransport::new(config.nodelay);
        Self::connect_with(transport, config)
    }

    /// Connect with the classic `(host, readport, writeport, timeout)` arguments
    pub fn connect_to(
        host: &str,
        read_port: u16,
        write_port: u16,
        timeout_ms: u64,
    ) -> Result<Self> {
        Self::connect(ClientConfig::new(host, read_port, write_port, timeout_ms))
    }
}

impl<T: Transport> Session<T> {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open both channels through `transport`
    ///
    /// If either channel cannot be opened the other is closed again and
    /// the error is returned; no session exists afterwards.
    pub fn connect_with(transport: T, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let timeout = config.timeout();

        let read = transport.open(&config.host, config.read_port, timeout)?;

        let write = match transport.open(&config.host, config.write_port, timeout) {
            Ok(channel) => channel,
            Err(e) => {
                let mut read = read;
                let _ = read.close();
                return Err(e);
            }
        };

        tracing::debug!(
            "Session established to {} (read={}, write={})",
            config.host,
            config.read_port,
            config.write_port
        );

        Ok(Self {
            read: ChannelSlot::new(ChannelRole::Read, config.read_port, read),
            write: ChannelSlot::new(ChannelRole::Write, config.write_port, write),
            config,
            transport,
            destroyed: AtomicBool::new(false),
        })
    }

    /// Release both channels
    ///
    /// The session stays usable for diagnostics and can be reopened with
    /// [`reconnect`](Self::reconnect). Closing twice is a no-op.
    pub fn close(&self) {
        let read = self.read.close();
        let write = self.write.close();
        if read || write {
            tracing::debug!("Session to {} closed", self.config.host);
        }
    }

    /// Reopen whichever channels are not live
    ///
    /// Fails with [`MemlinkError::ClosedSession`] after
    /// [`destroy`](Self::destroy), including a destroy that lands while the
    /// channels are reopening. If only one channel comes back both are
    /// closed again.
    pub fn reconnect(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(MemlinkError::ClosedSession);
        }

        let timeout = self.config.timeout();
        let host = &self.config.host;

        let outcome = self
            .read
            .reopen(&self.transport, host, timeout)
            .and_then(|()| self.write.reopen(&self.transport, host, timeout));

        if let Err(e) = outcome {
            self.read.close();
            self.write.close();
            return Err(e);
        }

        // destroy() may have closed the slots while they were reopening
        if self.is_destroyed() {
            self.read.close();
            self.write.close();
            return Err(MemlinkError::ClosedSession);
        }

        tracing::debug!("Session to {} reconnected", host);
        Ok(())
    }

    /// Close and invalidate the session for good
    pub fn destroy(&self) {
        if !self.destroyed.swap(true, Ordering::AcqRel) {
            tracing::debug!("Session to {} destroyed", self.config.host);
        }
        self.close();
    }

    /// True when no command can be sent without a reconnect
    pub fn is_closed(&self) -> bool {
        self.is_destroyed() || (self.read.is_closed() && self.write.is_closed())
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    fn slot(&self, role: ChannelRole) -> &ChannelSlot<T::Channel> {
        match role {
            ChannelRole::Read => &self.read,
            ChannelRole::Write => &self.write,
        }
    }

    /// Run a command and decode an OK payload with `decode`
    fn dispatch<R, F>(&self, command: Command, decode: F) -> Reply<R>
    where
        F: FnOnce(Bytes) -> Result<R>,
    {
        if self.is_destroyed() {
            return Reply::failed(Status::ClosedSession);
        }

        let slot = self.slot(command.role());
        let outcome = slot.call(
            &self.transport,
            &self.config.host,
            self.config.timeout(),
            &command,
            |response| match response.status {
                Status::Ok => decode(response.payload_bytes()).map(Reply::ok),
                status => Ok(Reply::failed(status)),
            },
        );

        match outcome {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!("{:?} failed: {}", command.command_type(), e);
                Reply::failed(e.status())
            }
        }
    }

    /// Run a command that only reports a status
    fn execute(&self, command: Command) -> Status {
        self.dispatch(command, |_| Ok(())).status()
    }

    // =========================================================================
    // Read Channel
    // =========================================================================

    /// Health check
    pub fn ping(&self) -> Status {
        self.execute(Command::Ping)
    }

    /// Ask the store to write a dump file
    pub fn dump(&self) -> Status {
        self.execute(Command::Dump)
    }

    /// Statistics for one key
    pub fn stat(&self, key: &str) -> Reply<Stat> {
        self.dispatch(
            Command::Stat {
                key: key.to_string(),
            },
            |payload| decode_stat(&payload),
        )
    }

    /// Statistics for the whole store
    pub fn stat_sys(&self) -> Reply<StatSys> {
        self.dispatch(Command::StatSys, |payload| decode_stat_sys(&payload))
    }

    /// Up to `len` values of `kind` matching `mask`, starting at position `from`
    pub fn range(
        &self,
        key: &str,
        kind: RangeKind,
        mask: &str,
        from: i32,
        len: u32,
    ) -> Reply<ResultSet> {
        self.dispatch(
            Command::Range {
                key: key.to_string(),
                kind,
                mask: mask.to_string(),
                from,
                len,
            },
            decode_items,
        )
    }

    pub fn range_visible(&self, key: &str, mask: &str, from: i32, len: u32) -> Reply<ResultSet> {
        self.range(key, RangeKind::Visible, mask, from, len)
    }

    pub fn range_tagdel(&self, key: &str, mask: &str, from: i32, len: u32) -> Reply<ResultSet> {
        self.range(key, RangeKind::TagDeleted, mask, from, len)
    }

    pub fn range_all(&self, key: &str, mask: &str, from: i32, len: u32) -> Reply<ResultSet> {
        self.range(key, RangeKind::All, mask, from, len)
    }

    /// Number of values matching `mask`
    pub fn count(&self, key: &str, mask: &str) -> Reply<Count> {
        self.dispatch(
            Command::Count {
                key: key.to_string(),
                mask: mask.to_string(),
            },
            |payload| decode_count(&payload),
        )
    }

    // =========================================================================
    // Write Channel: keys
    // =========================================================================

    /// Create a key holding `value_size`-byte values
    pub fn create(
        &self,
        key: &str,
        value_size: u32,
        mask: &str,
        list_kind: ListKind,
        value_type: ValueType,
    ) -> Status {
        self.execute(Command::Create {
            key: key.to_string(),
            value_size,
            mask: mask.to_string(),
            list_kind,
            value_type,
        })
    }

    pub fn create_list(&self, key: &str, value_size: u32, mask: &str) -> Status {
        self.create(key, value_size, mask, ListKind::List, ValueType::Binary)
    }

    pub fn create_queue(&self, key: &str, value_size: u32, mask: &str) -> Status {
        self.create(key, value_size, mask, ListKind::Queue, ValueType::Binary)
    }

    pub fn create_sortlist(
        &self,
        key: &str,
        value_size: u32,
        mask: &str,
        value_type: ValueType,
    ) -> Status {
        self.create(key, value_size, mask, ListKind::SortList, value_type)
    }

    /// Compact a key, dropping tag-deleted values
    pub fn clean(&self, key: &str) -> Status {
        self.execute(Command::Clean {
            key: key.to_string(),
        })
    }

    /// Remove a key and everything in it
    pub fn rmkey(&self, key: &str) -> Status {
        self.execute(Command::RmKey {
            key: key.to_string(),
        })
    }

    // =========================================================================
    // Write Channel: values
    // =========================================================================

    pub fn delete(&self, key: &str, value: &[u8]) -> Status {
        self.execute(Command::Delete {
            key: key.to_string(),
            value: value.to_vec(),
        })
    }

    pub fn delete_by_mask(&self, key: &str, mask: &str) -> Status {
        self.execute(Command::DeleteByMask {
            key: key.to_string(),
            mask: mask.to_string(),
        })
    }

    /// Insert at `pos`; [`POS_AUTO`] lets the store pick the position
    pub fn insert(&self, key: &str, value: &[u8], mask: &str, pos: i32) -> Status {
        self.execute(Command::Insert {
            key: key.to_string(),
            value: value.to_vec(),
            mask: mask.to_string(),
            pos,
        })
    }

    /// Insert into a sortlist at the position its ordering dictates
    pub fn sortlist_insert(&self, key: &str, value: &[u8], mask: &str) -> Status {
        self.insert(key, value, mask, POS_AUTO)
    }

    /// Move an existing value to `pos`
    pub fn move_value(&self, key: &str, value: &[u8], pos: i32) -> Status {
        self.execute(Command::Move {
            key: key.to_string(),
            value: value.to_vec(),
            pos,
        })
    }

    /// Replace the mask of an existing value
    pub fn mask(&self, key: &str, value: &[u8], mask: &str) -> Status {
        self.execute(Command::Mask {
            key: key.to_string(),
            value: value.to_vec(),
            mask: mask.to_string(),
        })
    }

    /// Tag an existing value, see [`TAG_DEL`](crate::protocol::TAG_DEL)
    pub fn tag(&self, key: &str, value: &[u8], tag: u8) -> Status {
        self.execute(Command::Tag {
            key: key.to_string(),
            value: value.to_vec(),
            tag,
        })
    }

    pub fn lpush(&self, key: &str, value: &[u8], mask: &str) -> Status {
        self.execute(Command::LPush {
            key: key.to_string(),
            value: value.to_vec(),
            mask: mask.to_string(),
        })
    }

    pub fn rpush(&self, key: &str, value: &[u8], mask: &str) -> Status {
        self.execute(Command::RPush {
            key: key.to_string(),
            value: value.to_vec(),
            mask: mask.to_string(),
        })
    }

    /// Pop `num` values from the head
    pub fn lpop(&self, key: &str, num: u32) -> Reply<ResultSet> {
        self.dispatch(
            Command::LPop {
                key: key.to_string(),
                num,
            },
            decode_items,
        )
    }

    /// Pop `num` values from the tail
    pub fn rpop(&self, key: &str, num: u32) -> Reply<ResultSet> {
        self.dispatch(
            Command::RPop {
                key: key.to_string(),
                num,
            },
            decode_items,
        )
    }

    pub fn lpop_one(&self, key: &str) -> Reply<ResultSet> {
        self.lpop(key, 1)
    }

    pub fn rpop_one(&self, key: &str) -> Reply<ResultSet> {
        self.rpop(key, 1)
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        self.close();
    }
}
