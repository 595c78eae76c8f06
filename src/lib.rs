/// Unroll - A Slack bot that copies thread replies into the channel timeline.
///
/// Readers who follow a channel without opening threads still see what was said:
/// every reply posted inside a thread of an allow-listed channel is reposted to
/// the channel as an attachment linking back to the original.
///
/// # Architecture
///
/// The system uses:
/// - slack-morphism Socket Mode for the inbound event stream
/// - reqwest for the `chat.getPermalink` and `chat.postMessage` Web API calls
/// - a single Tokio task that filters and forwards events in delivery order
///
/// # Example
///
/// ```no_run
/// use tokio_util::sync::CancellationToken;
/// use unroll::core::config::AppConfig;
/// use unroll::slack::{SlackClient, SocketModeSource, socket::event_channel};
/// use unroll::worker::Dispatcher;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = AppConfig::from_env()?;
///     unroll::setup_logging(config.debug);
///
///     let api = SlackClient::new(config.slack_bot_token.clone(), &config.slack_api_url);
///     let dispatcher = Dispatcher::new(api, config.channels.clone());
///     let (tx, rx) = event_channel();
///     let cancel = CancellationToken::new();
///
///     let worker = tokio::spawn({
///         let cancel = cancel.clone();
///         async move { dispatcher.run(rx, cancel).await }
///     });
///
///     SocketModeSource::new(&config.slack_app_token, &config.slack_api_url, tx)
///         .run()
///         .await?;
///     cancel.cancel();
///     worker.await?;
///     Ok(())
/// }
/// ```
pub mod core;
pub mod errors;
pub mod slack;
pub mod utils;
pub mod worker;

/// Configure structured logging with JSON output.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` when
/// `debug` is true. Safe to call more than once.
///
/// # Example
///
/// ```
/// unroll::setup_logging(false);
/// ```
pub fn setup_logging(debug: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
