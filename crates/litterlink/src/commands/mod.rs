//! Command handlers, one module per subcommand.

pub mod config_cmd;
pub mod login;
pub mod pets;
pub mod status;
pub mod visits;

use litterlink_config::Defaults;
use litterlink_core::Litterbox;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// What every vendor-facing handler needs besides the facade.
pub struct Context<'a> {
    pub global: &'a GlobalOpts,
    pub defaults: &'a Defaults,
    pub profile: &'a str,
    pub username: &'a str,
}

/// Route `cmd` to its handler. Everything except `config` logs in first.
pub async fn dispatch(
    cmd: Command,
    litterbox: &mut Litterbox,
    ctx: &Context<'_>,
) -> Result<(), CliError> {
    match cmd {
        Command::Config(args) => config_cmd::handle(args, ctx.global),
        Command::Login => {
            litterbox.login().await?;
            login::handle(litterbox, ctx);
            Ok(())
        }
        Command::Pets(args) => {
            litterbox.login().await?;
            pets::handle(litterbox, &args, ctx).await
        }
        Command::Visits(args) => {
            litterbox.login().await?;
            visits::handle(litterbox, &args, ctx).await
        }
        Command::Status(args) => {
            litterbox.login().await?;
            status::handle(litterbox, &args, ctx).await
        }
    }
}
