use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    bookbuddy_search::logging::init().context("init logging")?;

    let cli = bookbuddy_search::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        bookbuddy_search::cli::Command::Search(args) => {
            bookbuddy_search::search::run(args).await.context("search")?;
        }
        bookbuddy_search::cli::Command::Catalog { command } => {
            bookbuddy_search::catalog::run(command)
                .await
                .context("catalog")?;
        }
    }

    Ok(())
}
