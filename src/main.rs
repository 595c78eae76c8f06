use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use unroll::core::config::AppConfig;
use unroll::slack::socket::event_channel;
use unroll::slack::{SlackClient, SocketModeSource};
use unroll::worker::Dispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;
    unroll::setup_logging(config.debug);

    if config.channels.is_empty() {
        warn!("SLACK_CHANNELS is empty; no thread replies will be unrolled");
    }
    info!(channels = config.channels.len(), "starting unroll");

    let api = SlackClient::new(config.slack_bot_token.clone(), &config.slack_api_url);
    let dispatcher = Dispatcher::new(api, config.channels.clone());
    let (tx, rx) = event_channel();
    let cancel = CancellationToken::new();

    let worker = tokio::spawn({
        let cancel = cancel.clone();
        async move { dispatcher.run(rx, cancel).await }
    });

    // Blocks until the process is interrupted or the connection fails.
    let result = SocketModeSource::new(&config.slack_app_token, &config.slack_api_url, tx)
        .run()
        .await;

    cancel.cancel();
    if let Err(e) = worker.await {
        error!(error = %e, "dispatch task panicked");
    }

    if let Err(e) = result {
        error!(error = %e, "socket mode connection failed");
        return Err(e.into());
    }

    info!("unroll stopped");
    Ok(())
}
