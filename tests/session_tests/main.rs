//! Session test suite
//!
//! Runs against the loopback harness in `common`, plus a small TCP suite
//! against a real listener.

#[path = "../common/mod.rs"]
mod common;

mod concurrency_tests;
