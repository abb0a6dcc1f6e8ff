use anyhow::Result;
use clap::Parser;
use tracing::debug;

use linkcharge_cli::{
    cli::{Cli, Commands},
    commands, logging,
};
use linkcharge_config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.level());

    let settings = Settings::load_or_default(cli.config.as_deref()).await?;
    debug!("Using vault {}", cli.vault.display());

    match cli.command {
        Commands::Resolve { link, from } => {
            commands::resolve::execute(&cli.vault, settings, &link, &from)
        }
        Commands::Decorate { note, start, end } => {
            commands::decorate::execute(&cli.vault, settings, &note, start, end).await
        }
        Commands::Check { strict } => commands::check::execute(&cli.vault, settings, strict),
        Commands::Watch { panel, debounce_ms } => {
            commands::watch::execute(&cli.vault, settings, &panel, debounce_ms).await
        }
    }
}
