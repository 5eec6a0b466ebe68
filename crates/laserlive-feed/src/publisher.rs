//! `WebSocket` publisher to the relay.
//!
//! Items are sent strictly in order over one connection. When a send
//! fails the publisher reconnects, retrying until the relay is back, and
//! sends the failed item once more. A second failure drops that item and
//! the next item starts over with a fresh connection.

use std::time::Duration;

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use laserlive_types::Envelope;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::error::FeedError;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Ordered publisher with reconnect-and-resend.
pub struct Publisher {
    url: String,
    reconnect_delay: Duration,
    sink: Option<WsSink>,
}

impl Publisher {
    /// Create a publisher for `url`; nothing connects until the first send.
    pub const fn new(url: String, reconnect_delay: Duration) -> Self {
        Self {
            url,
            reconnect_delay,
            sink: None,
        }
    }

    /// Send one envelope, reconnecting and resending once on failure.
    pub async fn publish(&mut self, envelope: &Envelope) -> Result<(), FeedError> {
        let text = serde_json::to_string(envelope)?;
        match self.send_text(&text).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, action = %envelope.action, "send failed, reconnecting");
                self.send_text(&text).await
            }
        }
    }

    /// Close the connection if one is open.
    pub async fn close(&mut self) {
        if let Some(mut sink) = self.sink.take()
            && let Err(e) = sink.close().await
        {
            debug!(error = %e, "close failed");
        }
    }

    async fn send_text(&mut self, text: &str) -> Result<(), FeedError> {
        let mut sink = match self.sink.take() {
            Some(sink) => sink,
            None => self.connect_with_retry().await,
        };
        sink.send(Message::Text(text.to_owned())).await?;
        self.sink = Some(sink);
        Ok(())
    }

    async fn connect_with_retry(&self) -> WsSink {
        loop {
            match self.connect().await {
                Ok(sink) => {
                    info!(url = %self.url, "connected to relay");
                    return sink;
                }
                Err(e) => {
                    warn!(
                        url = %self.url,
                        error = %e,
                        retry_ms = self.reconnect_delay.as_millis(),
                        "relay connection failed"
                    );
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
    }

    async fn connect(&self) -> Result<WsSink, FeedError> {
        let (ws, _response) = connect_async(self.url.as_str()).await?;
        let (sink, mut stream) = ws.split();

        // The relay broadcasts to every socket, this one included.
        tokio::spawn(async move {
            while let Some(Ok(_)) = stream.next().await {}
        });

        Ok(sink)
    }
}
