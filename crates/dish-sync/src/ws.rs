//! WebSocket push channel

use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use dish_core::{DashboardConfig, Error, PushChannel, PushConnector, Result};

const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Opens WebSocket connections to the push endpoint
pub struct WsPushConnector {
    url: String,
}

impl WsPushConnector {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(&config.push_url)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PushConnector for WsPushConnector {
    async fn connect(&self) -> Result<Box<dyn PushChannel>> {
        debug!("Connecting to push channel at {}", self.url);

        let (stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| Error::channel(format!("Connection to {} failed: {}", self.url, e)))?;

        Ok(Box::new(WsPushChannel {
            stream,
            finished: false,
        }))
    }
}

/// One open WebSocket connection.
///
/// Control frames are handled here; only text payloads reach the controller.
pub struct WsPushChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    finished: bool,
}

#[async_trait]
impl PushChannel for WsPushChannel {
    async fn next_frame(&mut self) -> Option<Result<String>> {
        if self.finished {
            return None;
        }

        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text)),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => {
                        warn!("Ignoring non-UTF-8 binary frame on push channel");
                        continue;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    let reason = frame
                        .map(|f| f.reason.to_string())
                        .unwrap_or_else(|| "close frame received".to_string());
                    debug!("Push channel closed by server: {}", reason);
                    self.finished = true;
                    return None;
                }
                // Pings are answered by tungstenite while reading.
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    // An error always ends the connection; the next call reports the close.
                    self.finished = true;
                    return Some(Err(Error::channel(e.to_string())));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            }
        }
    }

    async fn close(&mut self) {
        self.finished = true;
        if let Err(e) = self.stream.close(None).await {
            debug!("Push channel close failed: {}", e);
        }
        // Drain until the server acknowledges the close
        let drain = async { while let Some(Ok(_)) = self.stream.next().await {} };
        if tokio::time::timeout(CLOSE_TIMEOUT, drain).await.is_err() {
            debug!("Push channel close was not acknowledged");
        }
    }
}
