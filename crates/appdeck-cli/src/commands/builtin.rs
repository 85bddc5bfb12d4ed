//! Commands answered locally without touching the transport.

use crate::client::Transport;
use crate::commands::{Command, CommandDescriptor, ExecutionContext, PROGRAM_NAME};
use crate::error::{CommandError, CommandResult};

/// `help [command]`: list commands or describe one.
#[derive(Debug, Clone, Default)]
pub struct Help {
    topics: Vec<CommandDescriptor>,
}

impl Help {
    /// Descriptor shared by every instance.
    pub const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
        name: "help",
        usage: "help [command]",
        description: "show help for a command.",
        min_args: 0,
    };

    /// Build help over `topics`; they are listed in name order.
    #[must_use]
    pub fn new(mut topics: Vec<CommandDescriptor>) -> Self {
        topics.sort_by_key(|topic| topic.name);
        topics.dedup_by_key(|topic| topic.name);
        Self { topics }
    }

    /// Descriptor for `name`, if known.
    #[must_use]
    pub fn topic(&self, name: &str) -> Option<&CommandDescriptor> {
        self.topics.iter().find(|topic| topic.name == name)
    }

    fn overview(&self) -> String {
        let width = self
            .topics
            .iter()
            .map(|topic| topic.name.len())
            .max()
            .unwrap_or(0);
        let mut text = format!("Usage: {PROGRAM_NAME} command [args]\n\nAvailable commands:\n");
        for topic in &self.topics {
            text.push_str(&format!(
                "  {name:<width$}  {description}\n",
                name = topic.name,
                description = topic.description
            ));
        }
        text
    }
}

impl Command for Help {
    fn descriptor(&self) -> CommandDescriptor {
        Self::DESCRIPTOR
    }

    fn run(&self, ctx: &mut ExecutionContext<'_>, _transport: &dyn Transport) -> CommandResult<()> {
        if ctx.args.is_empty() {
            let overview = self.overview();
            return ctx.write_out(overview.as_bytes());
        }

        let name = ctx.arg(0).to_string();
        let Some(topic) = self.topic(&name) else {
            return Err(CommandError::UnknownTopic { name });
        };
        ctx.write_out(
            format!(
                "Usage: {PROGRAM_NAME} {}\n\n{}\n",
                topic.usage, topic.description
            )
            .as_bytes(),
        )
    }
}

/// `version`: print the client version.
#[derive(Debug, Clone, Copy, Default)]
pub struct Version;

impl Version {
    /// Descriptor shared by every instance.
    pub const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
        name: "version",
        usage: "version",
        description: "display the current version.",
        min_args: 0,
    };
}

impl Command for Version {
    fn descriptor(&self) -> CommandDescriptor {
        Self::DESCRIPTOR
    }

    fn run(&self, ctx: &mut ExecutionContext<'_>, _transport: &dyn Transport) -> CommandResult<()> {
        ctx.write_line(&format!(
            "{PROGRAM_NAME} version {}.",
            env!("CARGO_PKG_VERSION")
        ))
    }
}
