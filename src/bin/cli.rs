//! memlink CLI Client
//!
//! Command-line interface for interacting with a memlink store.

use clap::{Parser, Subcommand, ValueEnum};
use memlink::config::{DEFAULT_READ_PORT, DEFAULT_WRITE_PORT};
use memlink::protocol::POS_AUTO;
use memlink::{ClientConfig, RangeKind, Reply, Session, Status, ValueType};
use tracing_subscriber::{fmt, EnvFilter};

/// memlink CLI
#[derive(Parser, Debug)]
#[command(name = "memlink-cli")]
#[command(about = "CLI for the memlink masked-list store")]
#[command(version)]
struct Args {
    /// Store host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Read channel port
    #[arg(short, long, default_value_t = DEFAULT_READ_PORT)]
    read_port: u16,

    /// Write channel port
    #[arg(short, long, default_value_t = DEFAULT_WRITE_PORT)]
    write_port: u16,

    /// Per-call timeout in milliseconds (0 blocks forever)
    #[arg(short, long, default_value = "30000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum KindArg {
    Visible,
    Tagdel,
    All,
}

impl From<KindArg> for RangeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Visible => RangeKind::Visible,
            KindArg::Tagdel => RangeKind::TagDeleted,
            KindArg::All => RangeKind::All,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ValueTypeArg {
    Int,
    Uint,
    Long,
    Ulong,
    Float,
    Double,
    String,
    Binary,
}

impl From<ValueTypeArg> for ValueType {
    fn from(value_type: ValueTypeArg) -> Self {
        match value_type {
            ValueTypeArg::Int => ValueType::Int,
            ValueTypeArg::Uint => ValueType::UInt,
            ValueTypeArg::Long => ValueType::Long,
            ValueTypeArg::Ulong => ValueType::ULong,
            ValueTypeArg::Float => ValueType::Float,
            ValueTypeArg::Double => ValueType::Double,
            ValueTypeArg::String => ValueType::String,
            ValueTypeArg::Binary => ValueType::Binary,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the store
    Ping,

    /// Ask the store to dump its data
    Dump,

    /// Create a positional list
    CreateList {
        key: String,
        value_size: u32,
        #[arg(default_value = "")]
        mask: String,
    },

    /// Create a queue
    CreateQueue {
        key: String,
        value_size: u32,
        #[arg(default_value = "")]
        mask: String,
    },

    /// Create a sorted list
    CreateSortlist {
        key: String,
        value_size: u32,
        #[arg(value_enum)]
        value_type: ValueTypeArg,
        #[arg(default_value = "")]
        mask: String,
    },

    /// Remove tag-deleted values from a key
    Clean { key: String },

    /// Remove a key
    Rmkey { key: String },

    /// Per-key statistics
    Stat { key: String },

    /// Whole-store statistics
    StatSys,

    /// Insert a value (position -1 lets the store decide)
    Insert {
        key: String,
        value: String,
        mask: String,
        #[arg(default_value_t = POS_AUTO, allow_hyphen_values = true)]
        pos: i32,
    },

    /// Delete a value
    Del { key: String, value: String },

    /// Delete all values matching a mask
    DelByMask { key: String, mask: String },

    /// Move a value to a new position
    Move {
        key: String,
        value: String,
        #[arg(allow_hyphen_values = true)]
        pos: i32,
    },

    /// Replace a value's mask
    Mask {
        key: String,
        value: String,
        mask: String,
    },

    /// Set a value's tag
    Tag { key: String, value: String, tag: u8 },

    /// List values
    Range {
        key: String,
        #[arg(long, value_enum, default_value = "visible")]
        kind: KindArg,
        #[arg(long, default_value = "")]
        mask: String,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        from: i32,
        #[arg(long, default_value = "100")]
        len: u32,
    },

    /// Count values matching a mask
    Count {
        key: String,
        #[arg(default_value = "")]
        mask: String,
    },

    /// Push at the head
    Lpush {
        key: String,
        value: String,
        #[arg(default_value = "")]
        mask: String,
    },

    /// Push at the tail
    Rpush {
        key: String,
        value: String,
        #[arg(default_value = "")]
        mask: String,
    },

    /// Pop from the head
    Lpop {
        key: String,
        #[arg(default_value = "1")]
        num: u32,
    },

    /// Pop from the tail
    Rpop {
        key: String,
        #[arg(default_value = "1")]
        num: u32,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = ClientConfig::builder()
        .host(&args.host)
        .read_port(args.read_port)
        .write_port(args.write_port)
        .timeout_ms(args.timeout_ms)
        .build();

    let session = match Session::connect(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to connect: {}", e);
            std::process::exit(2);
        }
    };

    let status = run(&session, args.command);
    session.destroy();

    if !status.is_ok() {
        eprintln!("{}", status);
        std::process::exit(1);
    }
}

/// Execute one subcommand and print its output
fn run(session: &Session, command: Commands) -> Status {
    match command {
        Commands::Ping => report(session.ping()),
        Commands::Dump => report(session.dump()),
        Commands::CreateList {
            key,
            value_size,
            mask,
        } => report(session.create_list(&key, value_size, &mask)),
        Commands::CreateQueue {
            key,
            value_size,
            mask,
        } => report(session.create_queue(&key, value_size, &mask)),
        Commands::CreateSortlist {
            key,
            value_size,
            value_type,
            mask,
        } => report(session.create_sortlist(&key, value_size, &mask, value_type.into())),
        Commands::Clean { key } => report(session.clean(&key)),
        Commands::Rmkey { key } => report(session.rmkey(&key)),
        Commands::Stat { key } => print_reply(session.stat(&key)),
        Commands::StatSys => print_reply(session.stat_sys()),
        Commands::Insert {
            key,
            value,
            mask,
            pos,
        } => report(session.insert(&key, value.as_bytes(), &mask, pos)),
        Commands::Del { key, value } => report(session.delete(&key, value.as_bytes())),
        Commands::DelByMask { key, mask } => report(session.delete_by_mask(&key, &mask)),
        Commands::Move { key, value, pos } => {
            report(session.move_value(&key, value.as_bytes(), pos))
        }
        Commands::Mask { key, value, mask } => {
            report(session.mask(&key, value.as_bytes(), &mask))
        }
        Commands::Tag { key, value, tag } => report(session.tag(&key, value.as_bytes(), tag)),
        Commands::Range {
            key,
            kind,
            mask,
            from,
            len,
        } => print_reply(session.range(&key, kind.into(), &mask, from, len)),
        Commands::Count { key, mask } => print_reply(session.count(&key, &mask)),
        Commands::Lpush { key, value, mask } => {
            report(session.lpush(&key, value.as_bytes(), &mask))
        }
        Commands::Rpush { key, value, mask } => {
            report(session.rpush(&key, value.as_bytes(), &mask))
        }
        Commands::Lpop { key, num } => print_reply(session.lpop(&key, num)),
        Commands::Rpop { key, num } => print_reply(session.rpop(&key, num)),
    }
}

fn report(status: Status) -> Status {
    if status.is_ok() {
        println!("OK");
    }
    status
}

fn print_reply<T: std::fmt::Display>(reply: Reply<T>) -> Status {
    if let Some(value) = reply.value() {
        print!("{}", value);
    }
    reply.status()
}
