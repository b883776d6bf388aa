mod cli;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use buffer_sync::{
    Session, SessionContext, config::Config, consts::DEFAULT_CONFIG_PATH, host::memory::MemoryHost,
    outbox,
};
use clap::Parser;
use cli::{args::Args, script};
use log::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}={}",
                    env!("CARGO_CRATE_NAME"),
                    args.verbose.log_level_filter()
                )
                .to_lowercase()
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(args.color.use_colors())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to initialise tracing")?;

    info!("Starting buffer-sync version {}", env!("CARGO_PKG_VERSION"));

    let config_path = args
        .config_path
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = Config::read_or_create(&config_path).await?;

    let steps = script::load(&args.script).await?;

    let (outbox, mut receiver) = outbox();
    let context = SessionContext::new(config.project.project_root(), outbox);
    info!("Sharing project at '{}'", context.project.root().display());
    let host = MemoryHost::new(config.project.line_ending);
    let mut session = Session::new(host, context, config.session);

    script::replay(&mut session, steps).context("Failed to replay script")?;

    let report = script::report(&session, &mut receiver)?;
    session.shutdown();

    print!(
        "{}",
        serde_yaml::to_string(&report).context("Failed to serialize report")?
    );

    Ok(())
}
