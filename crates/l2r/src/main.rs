use std::{process, sync::Arc};

use anyhow::Context;
use tracing::{error, info};

use l2r_core::{bot::Bot, config::Config};
use l2r_telegram::TelegramClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    l2r_core::logging::init("l2r")?;

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Invalid configuration: {e}");
            process::exit(1);
        }
    };

    let client = Arc::new(TelegramClient::new(&cfg));
    let mut bot = Bot::new(&cfg, client);

    if let Err(e) = bot.start().await {
        // Already logged by the bot.
        process::exit(e.exit_code());
    }

    shutdown_signal().await.context("failed to listen for shutdown signal")?;
    info!("shutdown signal received");

    bot.stop().await.context("failed to stop bot")?;
    Ok(())
}

async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res,
            _ = term.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}
