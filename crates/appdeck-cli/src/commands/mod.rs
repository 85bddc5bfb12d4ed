//! Command contract, shared request/response helpers, and the command registry.
//!
//! Every command issues at most one request through the injected
//! [`Transport`]; the helpers below keep the build → send → read → decode
//! sequence identical across commands.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::de::DeserializeOwned;

use crate::client::{ApiRequest, ApiResponse, Endpoint, Transport};
use crate::error::{CliError, CliResult, CommandError, CommandResult};

pub mod apps;
pub mod builtin;
pub mod log;

pub use apps::{AppCreate, AppGrant, AppList, AppRemove, AppRevoke};
pub use builtin::{Help, Version};
pub use log::AppLog;

/// Binary name shown in usage text.
pub const PROGRAM_NAME: &str = "appdeck";

/// Static metadata describing a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Name used to select the command.
    pub name: &'static str,
    /// Usage line without the program name.
    pub usage: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Minimum number of positional arguments.
    pub min_args: usize,
}

/// Per-invocation state handed to a command.
pub struct ExecutionContext<'a> {
    /// Positional arguments after the command name.
    pub args: Vec<String>,
    /// Destination for command output.
    pub stdout: &'a mut dyn Write,
    /// Destination for diagnostics.
    pub stderr: &'a mut dyn Write,
    /// Remote endpoint API paths are resolved against.
    pub endpoint: Endpoint,
}

impl<'a> ExecutionContext<'a> {
    /// Assemble a context for one invocation.
    pub fn new(
        args: Vec<String>,
        endpoint: Endpoint,
        stdout: &'a mut dyn Write,
        stderr: &'a mut dyn Write,
    ) -> Self {
        Self {
            args,
            stdout,
            stderr,
            endpoint,
        }
    }

    /// Positional argument at `index`. The registry guarantees the descriptor minimum.
    #[must_use]
    pub fn arg(&self, index: usize) -> &str {
        self.args.get(index).map_or("", String::as_str)
    }

    /// Write raw bytes to the output stream.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Output`] when the stream rejects the write.
    pub fn write_out(&mut self, bytes: &[u8]) -> CommandResult<()> {
        self.stdout
            .write_all(bytes)
            .map_err(|source| CommandError::Output { source })
    }

    /// Write `line` followed by a newline to the output stream.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Output`] when the stream rejects the write.
    pub fn write_line(&mut self, line: &str) -> CommandResult<()> {
        self.write_out(format!("{line}\n").as_bytes())
    }
}

/// Uniform interface implemented by every command.
pub trait Command {
    /// Static metadata; has no side effects.
    fn descriptor(&self) -> CommandDescriptor;

    /// Perform the command's single operation.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when the request cannot be built or sent, the
    /// response cannot be read or decoded, or output cannot be written.
    fn run(&self, ctx: &mut ExecutionContext<'_>, transport: &dyn Transport)
    -> CommandResult<()>;
}

/// Send `request` through `transport`, logging the exchange.
pub(crate) fn send(transport: &dyn Transport, request: ApiRequest) -> CommandResult<ApiResponse> {
    let method = request.method.clone();
    let path = request.path().to_string();
    tracing::debug!(%method, %path, "dispatching request");
    match transport.execute(request) {
        Ok(response) => {
            tracing::debug!(%method, %path, status = %response.status, "received response");
            Ok(response)
        }
        Err(err) => {
            tracing::warn!(%method, %path, error = %err, "request failed");
            Err(err.into())
        }
    }
}

/// Read the whole body. Taking the response by value drops it on every path.
pub(crate) fn read_body(response: ApiResponse) -> CommandResult<Vec<u8>> {
    let mut body = response.body;
    let mut bytes = Vec::new();
    body.read_to_end(&mut bytes)
        .map_err(|source| CommandError::ResponseRead { source })?;
    Ok(bytes)
}

/// Read and decode a body against the expected shape.
pub(crate) fn decode_body<T: DeserializeOwned>(
    response: ApiResponse,
    expected: &'static str,
) -> CommandResult<T> {
    let bytes = read_body(response)?;
    serde_json::from_slice(&bytes).map_err(|source| CommandError::Decode { expected, source })
}

/// Name → command mapping owned by the shell.
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Registry with every API command plus `help` and `version`.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(AppCreate);
        registry.register(AppGrant);
        registry.register(AppList);
        registry.register(AppLog);
        registry.register(AppRemove);
        registry.register(AppRevoke);
        registry.register(Version);
        registry.with_help()
    }

    /// Add `command`, replacing any command registered under the same name.
    pub fn register(&mut self, command: impl Command + 'static) {
        let name = command.descriptor().name;
        self.commands.insert(name, Box::new(command));
    }

    /// Register `help` over the commands known so far.
    #[must_use]
    pub fn with_help(mut self) -> Self {
        let mut topics: Vec<CommandDescriptor> = self.descriptors();
        topics.push(Help::DESCRIPTOR);
        self.register(Help::new(topics));
        self
    }

    /// Look a command up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|command| &**command)
    }

    /// Descriptors of all registered commands in name order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<CommandDescriptor> {
        self.commands.values().map(|command| command.descriptor()).collect()
    }

    /// Resolve `name`, check arity, and run the command.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Validation`] for unknown commands or missing
    /// arguments (the transport is not touched), and [`CliError::Failure`]
    /// when the command itself fails.
    pub fn execute(
        &self,
        name: &str,
        ctx: &mut ExecutionContext<'_>,
        transport: &dyn Transport,
    ) -> CliResult<()> {
        let command = self
            .get(name)
            .ok_or_else(|| CliError::validation(format!("command \"{name}\" does not exist")))?;
        let descriptor = command.descriptor();
        if ctx.args.len() < descriptor.min_args {
            return Err(CliError::validation(format!(
                "not enough arguments to call {}\n\nUsage: {PROGRAM_NAME} {}",
                descriptor.name, descriptor.usage
            )));
        }
        tracing::debug!(command = descriptor.name, args = ctx.args.len(), "running command");
        command.run(ctx, transport).map_err(CliError::from)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
