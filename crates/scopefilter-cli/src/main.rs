mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("SCOPEFILTER_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::TRACE)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        output::output_error(&format!("{:#}", e));
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            "scopefilter",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let ctx = CliContext::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Apply(args) => handlers::apply::handle(&ctx, args).await?,
        Commands::Valid(args) => handlers::valid::handle(&ctx, args)?,
        Commands::Describe => handlers::describe::handle(&ctx)?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}
