//! Application management commands: create, list, remove, grant, revoke.

use appdeck_api_models::{Application, CreateAppRequest, CreateAppResponse};
use reqwest::Method;

use crate::client::{ApiRequest, Transport};
use crate::commands::{Command, CommandDescriptor, ExecutionContext, decode_body, send};
use crate::error::CommandResult;
use crate::output::application_table;

/// `app-grant <appname> <teamname>`: `PUT /apps/{app}/{team}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppGrant;

impl AppGrant {
    /// Descriptor shared by every instance.
    pub const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
        name: "app-grant",
        usage: "app-grant <appname> <teamname>",
        description: "grants access to an app to a team.",
        min_args: 2,
    };
}

impl Command for AppGrant {
    fn descriptor(&self) -> CommandDescriptor {
        Self::DESCRIPTOR
    }

    fn run(&self, ctx: &mut ExecutionContext<'_>, transport: &dyn Transport) -> CommandResult<()> {
        let (app, team) = (ctx.arg(0).to_string(), ctx.arg(1).to_string());
        let request = ApiRequest::new(Method::PUT, &ctx.endpoint, &format!("/apps/{app}/{team}"))?;
        send(transport, request)?;
        ctx.write_line(&format!(r#"Team "{team}" was added to the "{app}" app"#))
    }
}

/// `app-revoke <appname> <teamname>`: `DELETE /apps/{app}/{team}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppRevoke;

impl AppRevoke {
    /// Descriptor shared by every instance.
    pub const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
        name: "app-revoke",
        usage: "app-revoke <appname> <teamname>",
        description: "revokes access to an app from a team.",
        min_args: 2,
    };
}

impl Command for AppRevoke {
    fn descriptor(&self) -> CommandDescriptor {
        Self::DESCRIPTOR
    }

    fn run(&self, ctx: &mut ExecutionContext<'_>, transport: &dyn Transport) -> CommandResult<()> {
        let (app, team) = (ctx.arg(0).to_string(), ctx.arg(1).to_string());
        let request = ApiRequest::new(
            Method::DELETE,
            &ctx.endpoint,
            &format!("/apps/{app}/{team}"),
        )?;
        send(transport, request)?;
        ctx.write_line(&format!(r#"Team "{team}" was removed from the "{app}" app"#))
    }
}

/// `app-list`: `GET /apps`, rendered as a table.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppList;

impl AppList {
    /// Descriptor shared by every instance.
    pub const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
        name: "app-list",
        usage: "app-list",
        description: "list all your apps.",
        min_args: 0,
    };
}

impl Command for AppList {
    fn descriptor(&self) -> CommandDescriptor {
        Self::DESCRIPTOR
    }

    fn run(&self, ctx: &mut ExecutionContext<'_>, transport: &dyn Transport) -> CommandResult<()> {
        let request = ApiRequest::new(Method::GET, &ctx.endpoint, "/apps")?;
        let response = send(transport, request)?;
        // 204 means "no apps"; a 200 with `[]` still prints the header
        if response.is_no_content() {
            return Ok(());
        }
        let apps: Vec<Application> = decode_body(response, "application list")?;
        ctx.write_out(&application_table(&apps).render())
    }
}

/// `app-create <appname> <framework>`: `POST /apps`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppCreate;

impl AppCreate {
    /// Descriptor shared by every instance.
    pub const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
        name: "app-create",
        usage: "app-create <appname> <framework>",
        description: "create a new app.",
        min_args: 2,
    };
}

impl Command for AppCreate {
    fn descriptor(&self) -> CommandDescriptor {
        Self::DESCRIPTOR
    }

    fn run(&self, ctx: &mut ExecutionContext<'_>, transport: &dyn Transport) -> CommandResult<()> {
        let payload = CreateAppRequest {
            name: ctx.arg(0).to_string(),
            framework: ctx.arg(1).to_string(),
        };
        let request = ApiRequest::new(Method::POST, &ctx.endpoint, "/apps")?.json(&payload)?;
        let response = send(transport, request)?;
        let created: CreateAppResponse = decode_body(response, "repository details")?;

        let app = payload.name;
        ctx.write_line(&format!(r#"App "{app}" successfully created!"#))?;
        ctx.write_line(&format!(
            r#"Your repository for "{app}" project is "{}""#,
            created.repository_url()
        ))
    }
}

/// `app-remove <appname>`: `DELETE /apps/{app}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppRemove;

impl AppRemove {
    /// Descriptor shared by every instance.
    pub const DESCRIPTOR: CommandDescriptor = CommandDescriptor {
        name: "app-remove",
        usage: "app-remove <appname>",
        description: "removes an app.",
        min_args: 1,
    };
}

impl Command for AppRemove {
    fn descriptor(&self) -> CommandDescriptor {
        Self::DESCRIPTOR
    }

    fn run(&self, ctx: &mut ExecutionContext<'_>, transport: &dyn Transport) -> CommandResult<()> {
        let app = ctx.arg(0).to_string();
        let request = ApiRequest::new(Method::DELETE, &ctx.endpoint, &format!("/apps/{app}"))?;
        send(transport, request)?;
        ctx.write_line(&format!(r#"App "{app}" successfully removed!"#))
    }
}
