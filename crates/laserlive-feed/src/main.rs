//! Feed binary for LaserLive.
//!
//! Reads a TDF log, runs it through the parser one line at a time, and
//! publishes every metadata snapshot and event to the relay in order.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the environment
//! 3. Read and decode the log file
//! 4. Parse and publish, pacing events when `FEED_SPEED` is set

mod config;
mod error;
mod pacing;
mod publisher;
mod source;

use laserlive_parser::TdfStream;
use laserlive_types::Envelope;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::FeedConfig;
use crate::pacing::Pacer;
use crate::publisher::Publisher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("laserlive-feed starting");

    let config = FeedConfig::from_env()?;
    info!(
        relay_url = config.relay_url,
        feed_file = %config.feed_file.display(),
        speed = config.speed,
        "Configuration loaded"
    );

    let text = source::read_log(&config.feed_file).await?;

    let mut stream = TdfStream::new();
    let mut pacer = Pacer::new(config.speed);
    let mut publisher = Publisher::new(config.relay_url.clone(), config.reconnect_delay);
    let mut published: u64 = 0;
    let mut dropped: u64 = 0;

    for line in text.split('\n') {
        for item in stream.process_line(line) {
            if let Some(event) = item.as_event()
                && let Some(delay) = pacer.delay_before(event.time)
            {
                tokio::time::sleep(delay).await;
            }

            let envelope = Envelope::for_publish(&item)?;
            match publisher.publish(&envelope).await {
                Ok(()) => published = published.saturating_add(1),
                Err(e) => {
                    warn!(error = %e, action = %envelope.action, "item dropped after resend");
                    dropped = dropped.saturating_add(1);
                }
            }
        }
    }

    publisher.close().await;
    info!(
        lines = stream.lines_seen(),
        published,
        dropped,
        players = stream.roster().players().len(),
        "laserlive-feed finished"
    );
    Ok(())
}
