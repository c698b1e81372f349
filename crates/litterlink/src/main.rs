mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use litterlink_core::Litterbox;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never talk to a vendor
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        cmd => {
            let (profile, cfg, litterbox_config) = config::resolve(&cli.global)?;
            let username = litterbox_config.username.clone();
            let mut litterbox = Litterbox::new(litterbox_config)?;

            tracing::debug!(command = ?cmd, profile, "dispatching command");
            let ctx = commands::Context {
                global: &cli.global,
                defaults: &cfg.defaults,
                profile: &profile,
                username: &username,
            };
            commands::dispatch(cmd, &mut litterbox, &ctx)
                .await
                .map_err(|e| e.with_profile(&profile))
        }
    }
}
