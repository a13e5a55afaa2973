//! # memlink client
//!
//! Client for the memlink masked-list key-value store with:
//! - Separate read and write channels per session
//! - Length-framed binary commands, opaque byte values
//! - Zero-copy decoding of value lists
//! - Status codes for every command, errors only for failed connects
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Session                              │
//! │              (connect / close / reconnect / destroy)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ route by command class
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Read  Slot  │          │ Write Slot  │
//!   │  (Mutex)    │          │  (Mutex)    │
//!   └──────┬──────┘          └──────┬──────┘
//!          │      Codec + Transport │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  read port  │          │ write port  │
//!   └─────────────┘          └─────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │ Result Decoder│
//!               └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use memlink::{ClientConfig, Session, Status};
//!
//! let session = Session::connect(ClientConfig::default())?;
//! assert_eq!(session.create_list("users", 8, "4:3:1"), Status::Ok);
//! let _ = session.insert("users", b"u0000001", "8:1:1", 0);
//!
//! let reply = session.range_visible("users", "", 0, 10);
//! if let Some(result) = reply.value() {
//!     print!("{}", result);
//! }
//! # Ok::<(), memlink::MemlinkError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transport;
pub mod results;
pub mod dispatch;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{MemlinkError, Result};
pub use config::ClientConfig;
pub use protocol::{ListKind, RangeKind, Status, ValueType};
pub use results::{Count, Item, Reply, ResultSet, Stat, StatSys};
pub use session::Session;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
