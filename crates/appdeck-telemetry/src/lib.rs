#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(
    dead_code,
    unused,
    unused_imports,
    unreachable_pub,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]

//! Telemetry primitives for the appdeck client.
//!
//! Layout: `init.rs` (subscriber installation and logging configuration),
//! `error.rs` (error type returned when installation fails).

pub mod error;
pub mod init;

pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
