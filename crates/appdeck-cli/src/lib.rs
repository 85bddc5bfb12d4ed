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
#![allow(clippy::redundant_pub_crate)]

//! Command-line client for a remote application-management API.
//!
//! Layout:
//! - `cli.rs`: argument parsing, logging setup, and dispatch
//! - `commands/`: the `Command` contract, the registry, and one type per API operation
//! - `client.rs`: request/response types, the `Transport` seam, and the HTTP transport
//! - `output.rs`: table and log renderers
//! - `error.rs`: command, transport, and CLI error types
//! - `main.rs`: thin entrypoint delegating to `run()`

pub mod cli;
pub mod client;
pub mod commands;
pub mod error;
pub mod output;

#[cfg(test)]
pub(crate) mod testing;

pub use cli::{run, run_from};
pub use client::{ApiRequest, ApiResponse, DEFAULT_TARGET, Endpoint, HttpTransport, Transport};
pub use commands::{
    AppCreate, AppGrant, AppList, AppLog, AppRemove, AppRevoke, Command, CommandDescriptor,
    CommandRegistry, ExecutionContext, Help, Version,
};
pub use error::{CliError, CliResult, CommandError, CommandResult, TransportError};
pub use output::Table;
