use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use relister::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand};
use relister::adapter::inbound::cli::output::{self, OutputConfig};
use relister::adapter::inbound::cli::config::load_or_default;
use relister::adapter::inbound::cli as handlers;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Run(args) => {
            let config = load_or_default(&cli.config)
                .with_context(|| format!("loading {}", cli.config.display()))?;
            config.init_logging();
            info!(fixture = %args.fixture.display(), "relister starting");
            handlers::run::execute(&config, args).await?;
        }
        Commands::Config(ConfigCommand::Show) => handlers::config::execute_show(&cli.config)?,
        Commands::Config(ConfigCommand::Validate) => handlers::config::execute_validate(&cli.config)?,
        Commands::Tick(args) => handlers::tick::execute(args)?,
    }
    Ok(())
}
