use clap::Parser;
use partscan_app::cli::{Cli, Commands};
use partscan_app::{commands, init_tracing, load_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    tracing::info!("Starting Partscan v{}", env!("CARGO_PKG_VERSION"));
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract { text } => commands::extract(&text),
        Commands::Lookup { token, direct } => commands::lookup(&config, &token, direct).await,
        Commands::Serve { bind } => commands::serve(&config, bind).await,
        Commands::Scan { direct } => commands::scan(&config, direct).await,
        Commands::Config { save } => commands::config(&config, cli.config.as_deref(), save),
    }
}
