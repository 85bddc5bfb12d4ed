//! `log <appname>`: print an application's log in server order.

use appdeck_api_models::LogEntry;
use reqwest::Method;

use crate::client::{ApiRequest, Transport};
use crate::commands::{Command, CommandDescriptor, ExecutionContext, decode_body, send};
use crate::error::CommandResult;
use crate::output::render_log_lines;

/// `GET /apps/{app}/log`, one `<timestamp> - <message>` line per entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppLog;

impl AppLog {
    /// Descriptor shared by every instance.
    pub const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
        name: "log",
        usage: "log <appname>",
        description: "show logs for an app.",
        min_args: 1,
    };
}

impl Command for AppLog {
    fn descriptor(&self) -> CommandDescriptor {
        Self::DESCRIPTOR
    }

    fn run(&self, ctx: &mut ExecutionContext<'_>, transport: &dyn Transport) -> CommandResult<()> {
        let app = ctx.arg(0).to_string();
        let request = ApiRequest::new(Method::GET, &ctx.endpoint, &format!("/apps/{app}/log"))?;
        let response = send(transport, request)?;
        if response.is_no_content() {
            return Ok(());
        }
        let entries: Vec<LogEntry> = decode_body(response, "log entries")?;
        ctx.write_out(render_log_lines(&entries).as_bytes())
    }
}
