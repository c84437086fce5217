//! WebSocket stream client with automatic reconnection.
//!
//! Owns one connection to a streaming endpoint and forwards text frames to
//! the consumer over a channel. Outbound control frames are accepted through
//! a bounded sender, and a oneshot signal shuts the connection down cleanly
//! exactly once.

use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Stream client configuration.
#[derive(Clone, Debug)]
pub struct StreamConfig {
    /// WebSocket URL to connect to.
    pub url: String,
    /// Maximum consecutive failed reconnection attempts before giving up
    /// (0 = retry forever).
    pub max_reconnect_attempts: u32,
    /// Delay before the first reconnection attempt; doubles per attempt.
    pub initial_reconnect_delay: Duration,
    /// Upper bound on the reconnection delay.
    pub max_reconnect_delay: Duration,
    /// Interval for keepalive ping frames.
    pub ping_interval: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_reconnect_attempts: 0,
            initial_reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(60),
            ping_interval: Duration::from_secs(30),
        }
    }
}

impl StreamConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn max_reconnects(mut self, n: u32) -> Self {
        self.max_reconnect_attempts = n;
        self
    }

    pub fn initial_delay(mut self, d: Duration) -> Self {
        self.initial_reconnect_delay = d;
        self
    }

    pub fn max_delay(mut self, d: Duration) -> Self {
        self.max_reconnect_delay = d;
        self
    }

    pub fn ping_interval(mut self, d: Duration) -> Self {
        self.ping_interval = d;
        self
    }
}

/// Events emitted by the stream task.
#[derive(Clone, Debug)]
pub enum StreamEvent {
    /// Connection established (also emitted after a reconnect).
    Connected,
    /// Connection closed for good; no further events will arrive.
    Disconnected,
    /// Connection lost, retrying.
    Reconnecting { attempt: u32 },
    /// Inbound text frame.
    Frame(String),
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Send failed: {0}")]
    Send(String),
    #[error("Maximum reconnection attempts exceeded")]
    ReconnectLimit,
}

/// How a single connection session ended.
enum SessionEnd {
    /// The consumer side went away; nobody is listening anymore.
    ConsumerGone,
    /// Shutdown was requested; stop without reconnecting.
    Shutdown,
}

/// Run the connection loop until shutdown, consumer loss, or retry
/// exhaustion.
///
/// Inbound frames and lifecycle transitions go to `events`; text frames read
/// from `outbound` are written to the socket while it is open. Frames queued
/// while disconnected stay in the channel until the next session drains them,
/// so callers gate sends on connection state themselves. A server-initiated
/// close counts as a connection drop and is reconnected like any other
/// failure; only the shutdown signal ends the task for good.
pub async fn run(
    config: StreamConfig,
    events: mpsc::UnboundedSender<StreamEvent>,
    mut outbound: mpsc::Receiver<String>,
    mut shutdown: oneshot::Receiver<()>,
) -> Result<(), StreamError> {
    let mut attempts = 0u32;
    let mut delay = config.initial_reconnect_delay;

    loop {
        match session(&config, &events, &mut outbound, &mut shutdown).await {
            Ok(SessionEnd::Shutdown) => {
                tracing::info!("Stream shut down");
                let _ = events.send(StreamEvent::Disconnected);
                return Ok(());
            }
            Ok(SessionEnd::ConsumerGone) => {
                tracing::debug!("Stream consumer dropped, stopping");
                let _ = events.send(StreamEvent::Disconnected);
                return Ok(());
            }
            Err(e) => {
                attempts += 1;
                tracing::warn!(error = %e, attempt = attempts, "Stream error, reconnecting");

                if config.max_reconnect_attempts > 0 && attempts >= config.max_reconnect_attempts {
                    tracing::error!("Giving up after {} reconnection attempts", attempts);
                    let _ = events.send(StreamEvent::Disconnected);
                    return Err(StreamError::ReconnectLimit);
                }
                if events.send(StreamEvent::Reconnecting { attempt: attempts }).is_err() {
                    return Ok(());
                }

                tokio::select! {
                    _ = &mut shutdown => {
                        let _ = events.send(StreamEvent::Disconnected);
                        return Ok(());
                    }
                    _ = sleep(delay) => {}
                }
                delay = (delay * 2).min(config.max_reconnect_delay);
            }
        }
    }
}

/// Drive one connection until it ends.
async fn session(
    config: &StreamConfig,
    events: &mpsc::UnboundedSender<StreamEvent>,
    outbound: &mut mpsc::Receiver<String>,
    shutdown: &mut oneshot::Receiver<()>,
) -> Result<SessionEnd, StreamError> {
    tracing::info!(url = %config.url, "Connecting to stream");

    let connect = connect_async(&config.url);
    let ws_stream = tokio::select! {
        res = connect => res.map_err(|e| StreamError::Connect(e.to_string()))?.0,
        _ = &mut *shutdown => return Ok(SessionEnd::Shutdown),
    };
    let (mut write, mut read) = ws_stream.split();

    tracing::info!("Stream connected");
    if events.send(StreamEvent::Connected).is_err() {
        return Ok(SessionEnd::ConsumerGone);
    }

    let mut ping_interval = tokio::time::interval(config.ping_interval);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // First tick fires immediately; consume it so pings start one interval in.
    ping_interval.tick().await;
    let mut waiting_for_pong = false;

    loop {
        tokio::select! {
            _ = &mut *shutdown => {
                let _ = write.send(Message::Close(None)).await;
                return Ok(SessionEnd::Shutdown);
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if events.send(StreamEvent::Frame(text)).is_err() {
                            tracing::debug!("Event receiver dropped, closing stream");
                            return Ok(SessionEnd::ConsumerGone);
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        write.send(Message::Pong(data)).await
                            .map_err(|e| StreamError::Send(e.to_string()))?;
                    }
                    Some(Ok(Message::Pong(_))) => {
                        waiting_for_pong = false;
                    }
                    Some(Ok(Message::Close(_))) => {
                        // Public feeds drop idle connections; treat a remote
                        // close like any other drop and reconnect.
                        tracing::info!("Server closed the connection");
                        return Err(StreamError::Connect("Closed by server".into()));
                    }
                    Some(Err(e)) => {
                        return Err(StreamError::Connect(e.to_string()));
                    }
                    None => {
                        return Err(StreamError::Connect("Stream ended unexpectedly".into()));
                    }
                    _ => {}
                }
            }

            frame = outbound.recv() => {
                match frame {
                    Some(text) => {
                        write.send(Message::Text(text)).await
                            .map_err(|e| StreamError::Send(e.to_string()))?;
                    }
                    None => return Ok(SessionEnd::ConsumerGone),
                }
            }

            _ = ping_interval.tick() => {
                if waiting_for_pong {
                    return Err(StreamError::Connect("Pong timeout".into()));
                }
                write.send(Message::Ping(vec![])).await
                    .map_err(|e| StreamError::Send(e.to_string()))?;
                waiting_for_pong = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = StreamConfig::default();
        assert_eq!(config.max_reconnect_attempts, 0);
        assert_eq!(config.initial_reconnect_delay, Duration::from_secs(1));
        assert_eq!(config.max_reconnect_delay, Duration::from_secs(60));
        assert_eq!(config.ping_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_config_builder_chain() {
        let config = StreamConfig::new("wss://example.com")
            .max_reconnects(3)
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_secs(10))
            .ping_interval(Duration::from_secs(20));

        assert_eq!(config.url, "wss://example.com");
        assert_eq!(config.max_reconnect_attempts, 3);
        assert_eq!(config.initial_reconnect_delay, Duration::from_millis(100));
        assert_eq!(config.max_reconnect_delay, Duration::from_secs(10));
        assert_eq!(config.ping_interval, Duration::from_secs(20));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            StreamError::Connect("timeout".into()).to_string(),
            "Connection failed: timeout"
        );
        assert_eq!(
            StreamError::ReconnectLimit.to_string(),
            "Maximum reconnection attempts exceeded"
        );
    }

    #[tokio::test]
    async fn test_run_gives_up_after_max_reconnects() {
        let config = StreamConfig::new("wss://invalid.localhost.test:1")
            .max_reconnects(2)
            .initial_delay(Duration::from_millis(10));

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (_out_tx, out_rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = oneshot::channel();

        let result = tokio::time::timeout(
            Duration::from_secs(10),
            run(config, event_tx, out_rx, stop_rx),
        )
        .await
        .expect("run did not finish");
        assert!(matches!(result, Err(StreamError::ReconnectLimit)));

        // One Reconnecting event, then the terminal Disconnected.
        let mut saw_reconnecting = false;
        let mut saw_disconnected = false;
        while let Ok(ev) = event_rx.try_recv() {
            match ev {
                StreamEvent::Reconnecting { .. } => saw_reconnecting = true,
                StreamEvent::Disconnected => saw_disconnected = true,
                _ => {}
            }
        }
        assert!(saw_reconnecting);
        assert!(saw_disconnected);
    }

    #[test]
    fn test_run_stops_on_shutdown_while_retrying() {
        tokio_test::block_on(async {
            let config = StreamConfig::new("wss://invalid.localhost.test:1")
                .initial_delay(Duration::from_secs(30));

            let (event_tx, mut event_rx) = mpsc::unbounded_channel();
            let (_out_tx, out_rx) = mpsc::channel(8);
            let (stop_tx, stop_rx) = oneshot::channel();

            let handle = tokio::spawn(run(config, event_tx, out_rx, stop_rx));
            // Let the first connect attempt fail, then request shutdown.
            sleep(Duration::from_millis(200)).await;
            let _ = stop_tx.send(());

            let result = tokio::time::timeout(Duration::from_secs(10), handle)
                .await
                .expect("run did not stop")
                .expect("task panicked");
            assert!(result.is_ok());

            let mut saw_disconnected = false;
            while let Ok(ev) = event_rx.try_recv() {
                if matches!(ev, StreamEvent::Disconnected) {
                    saw_disconnected = true;
                }
            }
            assert!(saw_disconnected);
        });
    }

    #[tokio::test]
    async fn test_remote_close_triggers_reconnect() {
        // Accept exactly one connection and close it from the server side;
        // the client must treat that as a drop and attempt to reconnect.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                if let Ok(mut ws) = tokio_tungstenite::accept_async(socket).await {
                    let _ = ws.close(None).await;
                }
            }
        });

        let config = StreamConfig::new(format!("ws://{}", addr))
            .max_reconnects(2)
            .initial_delay(Duration::from_millis(10));

        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (_out_tx, out_rx) = mpsc::channel(8);
        let (_stop_tx, stop_rx) = oneshot::channel();

        // The listener is gone after the first accept, so the retry fails
        // and the attempt budget runs out.
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            run(config, event_tx, out_rx, stop_rx),
        )
        .await
        .expect("run did not finish");
        assert!(matches!(result, Err(StreamError::ReconnectLimit)));

        let mut saw_connected = false;
        let mut saw_reconnecting = false;
        while let Ok(ev) = event_rx.try_recv() {
            match ev {
                StreamEvent::Connected => saw_connected = true,
                StreamEvent::Reconnecting { .. } => saw_reconnecting = true,
                _ => {}
            }
        }
        assert!(saw_connected, "client should have connected once");
        assert!(
            saw_reconnecting,
            "remote close should trigger a reconnect attempt, not a clean stop"
        );
    }
}
