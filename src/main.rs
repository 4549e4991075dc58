use std::path::PathBuf;
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
    maktaba::logging::init().context("init logging")?;

    let cli = maktaba::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let data_dir = PathBuf::from(&cli.data_dir);
    match cli.command {
        maktaba::cli::Command::List(args) => {
            maktaba::browse::list(&data_dir, args).await.context("list")?;
        }
        maktaba::cli::Command::Read(args) => {
            maktaba::browse::read(&data_dir, args).await.context("read")?;
        }
        maktaba::cli::Command::Promotions => {
            maktaba::browse::promotions(&data_dir)
                .await
                .context("promotions")?;
        }
        maktaba::cli::Command::About => {
            maktaba::browse::about(&data_dir).await.context("about")?;
        }
        maktaba::cli::Command::Admin { command } => {
            maktaba::admin::run(&data_dir, command)
                .await
                .context("admin")?;
        }
    }

    Ok(())
}
