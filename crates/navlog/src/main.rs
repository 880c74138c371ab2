mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use navlog_telemetry::Paths;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let paths = Paths::current()?;
    let config = commands::load_config(&paths, cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(&paths, &config, &args),
        Commands::Analyze(args) => commands::analyze::run(&paths, config, &args),
        Commands::Accept { logs, json } => {
            let dir = commands::logs_dir(&paths, &config, logs);
            commands::accept::run(&dir, &config, json)
        }
        Commands::Sessions { logs } => {
            let dir = commands::logs_dir(&paths, &config, logs);
            commands::sessions::run(&dir)
        }
        Commands::Surveys { dir, out } => commands::surveys::run(&paths, &config, dir, out),
        Commands::Version => commands::version::run(),
    }
}
