//! Argument parsing, logging setup, and command dispatch.

use std::ffi::OsString;
use std::io::{self, Write};

use appdeck_telemetry::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
use clap::{Parser, ValueEnum};
use uuid::Uuid;

use crate::client::{DEFAULT_TARGET, Endpoint, HttpTransport, Transport};
use crate::commands::{CommandRegistry, ExecutionContext};
use crate::error::{CliError, CliResult};

#[derive(Debug, Parser)]
#[command(
    name = "appdeck",
    version,
    about = "Command-line client for the application-management API"
)]
pub(crate) struct Cli {
    #[arg(
        long,
        env = "APPDECK_TARGET",
        default_value = DEFAULT_TARGET,
        help = "Base URL of the remote API"
    )]
    pub(crate) target: String,
    #[arg(
        long,
        env = "APPDECK_LOG",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log filter used when RUST_LOG is unset"
    )]
    pub(crate) log_level: String,
    #[arg(
        long,
        env = "APPDECK_LOG_FORMAT",
        value_enum,
        help = "Log output format; defaults to pretty in debug builds and json otherwise"
    )]
    pub(crate) log_format: Option<LogFormatArg>,
    #[arg(value_name = "COMMAND", default_value = "help")]
    pub(crate) command: String,
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) args: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Parses process arguments, runs the selected command against the real HTTP
/// transport, and reports failures on stderr. Returns the process exit code.
pub fn run() -> i32 {
    let cli = Cli::parse();
    let config = LoggingConfig {
        level: &cli.log_level,
        format: cli.log_format.map_or_else(LogFormat::infer, Into::into),
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: {err}");
    }

    let trace_id = Uuid::new_v4().to_string();
    let transport = match HttpTransport::new(&trace_id) {
        Ok(transport) => transport,
        Err(err) => {
            let err = CliError::failure(err);
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    let stdout = io::stdout();
    let stderr = io::stderr();
    run_with(cli, &transport, &mut stdout.lock(), &mut stderr.lock())
}

/// Parse `args` (including the program name) and run against `transport`.
///
/// Used by integration tests to drive the full shell without touching the
/// process streams or the global logger.
pub fn run_from<I, T>(
    args: I,
    transport: &dyn Transport,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => run_with(cli, transport, stdout, stderr),
        Err(err) => {
            let sink: &mut dyn Write = if err.use_stderr() {
                &mut *stderr
            } else {
                &mut *stdout
            };
            let _ = write!(sink, "{err}");
            err.exit_code()
        }
    }
}

fn run_with(
    cli: Cli,
    transport: &dyn Transport,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    let result = dispatch(cli, transport, stdout, stderr);
    match result {
        Ok(()) => 0,
        Err(err) => {
            let _ = writeln!(stderr, "error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn dispatch(
    cli: Cli,
    transport: &dyn Transport,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> CliResult<()> {
    let registry = CommandRegistry::standard();
    let endpoint = Endpoint::new(cli.target);
    tracing::debug!(command = %cli.command, target = endpoint.base(), "dispatching command");

    let mut ctx = ExecutionContext::new(cli.args, endpoint, stdout, stderr);
    registry.execute(&cli.command, &mut ctx, transport)?;
    ctx.stdout
        .flush()
        .map_err(|err| CliError::failure(anyhow::anyhow!("failed to flush output: {err}")))
}
