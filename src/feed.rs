//! Blockchain.info unconfirmed transaction feed.
//!
//! Wraps the raw stream client with the inventory protocol: subscribe and
//! unsubscribe control frames, and parsing of inbound `utx` frames into
//! new-transaction events. The stream task runs on its own thread with a
//! current-thread runtime; the GUI drains events with non-blocking polls.

use crate::stream::{self, StreamConfig, StreamEvent};
use serde::{Deserialize, Serialize};
use std::thread;
use tokio::runtime::Builder;
use tokio::sync::{mpsc, oneshot};

/// Control op requesting unconfirmed transaction notifications.
pub const SUBSCRIBE_OP: &str = "unconfirmed_sub";

/// Control op cancelling unconfirmed transaction notifications.
pub const UNSUBSCRIBE_OP: &str = "unconfirmed_unsub";

/// Inbound op carrying a new unconfirmed transaction.
const NEW_TRANSACTION_OP: &str = "utx";

#[derive(Serialize)]
struct ControlFrame<'a> {
    op: &'a str,
}

#[derive(Deserialize)]
struct InboundFrame {
    op: String,
    #[serde(default)]
    x: Option<TransactionPayload>,
}

#[derive(Deserialize)]
struct TransactionPayload {
    hash: String,
}

/// Extract the transaction hash from a feed frame.
///
/// Returns `None` for every frame that is not a well-formed `utx` frame;
/// malformed JSON and unknown ops are dropped, never surfaced as faults.
pub fn parse_transaction_frame(text: &str) -> Option<String> {
    let frame: InboundFrame = serde_json::from_str(text).ok()?;
    if frame.op != NEW_TRANSACTION_OP {
        return None;
    }
    frame.x.map(|payload| payload.hash)
}

/// Events surfaced to the view layer.
#[derive(Clone, Debug)]
pub enum FeedEvent {
    Connected,
    Disconnected,
    Reconnecting { attempt: u32 },
    NewTransaction { hash: String },
}

/// Handle to the live feed connection.
///
/// Owns the control channel and the shutdown signal; the connection is shut
/// down exactly once, either explicitly via [`close`](Self::close) or on
/// drop.
pub struct FeedConnection {
    events: mpsc::UnboundedReceiver<StreamEvent>,
    control: mpsc::Sender<String>,
    shutdown: Option<oneshot::Sender<()>>,
    open: bool,
    subscribed: bool,
}

impl FeedConnection {
    /// Connect to the feed endpoint on a background thread.
    ///
    /// The stream retries forever with exponential backoff; connection state
    /// is reported through [`poll_event`](Self::poll_event).
    pub fn open(feed_url: &str) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (control_tx, control_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let config = StreamConfig::new(feed_url);
        thread::spawn(move || {
            match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => {
                    if let Err(e) =
                        runtime.block_on(stream::run(config, event_tx, control_rx, shutdown_rx))
                    {
                        tracing::error!(error = %e, "Feed stream terminated");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create runtime for feed stream");
                }
            }
        });

        Self::from_channels(event_rx, control_tx, shutdown_tx)
    }

    fn from_channels(
        events: mpsc::UnboundedReceiver<StreamEvent>,
        control: mpsc::Sender<String>,
        shutdown: oneshot::Sender<()>,
    ) -> Self {
        Self {
            events,
            control,
            shutdown: Some(shutdown),
            open: false,
            subscribed: false,
        }
    }

    /// Drain the next feed event, if one is pending.
    ///
    /// Non-transaction frames are consumed and dropped here, so a returned
    /// event is always meaningful to the view. Connection-state bookkeeping
    /// happens as a side effect, including the idempotent re-subscribe after
    /// a reconnect.
    pub fn poll_event(&mut self) -> Option<FeedEvent> {
        loop {
            match self.events.try_recv() {
                Ok(StreamEvent::Frame(text)) => {
                    if let Some(hash) = parse_transaction_frame(&text) {
                        return Some(FeedEvent::NewTransaction { hash });
                    }
                    tracing::debug!(frame = %text, "Ignoring non-transaction frame");
                }
                Ok(StreamEvent::Connected) => {
                    self.open = true;
                    if self.subscribed {
                        tracing::info!("Feed reconnected, re-subscribing");
                        self.send_op(SUBSCRIBE_OP);
                    }
                    return Some(FeedEvent::Connected);
                }
                Ok(StreamEvent::Reconnecting { attempt }) => {
                    self.open = false;
                    return Some(FeedEvent::Reconnecting { attempt });
                }
                Ok(StreamEvent::Disconnected) => {
                    self.open = false;
                    return Some(FeedEvent::Disconnected);
                }
                Err(mpsc::error::TryRecvError::Empty) => return None,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.open = false;
                    return None;
                }
            }
        }
    }

    /// Whether the underlying connection is currently open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the user is subscribed to new-transaction notifications.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Request unconfirmed transaction notifications.
    ///
    /// Silent no-op unless the connection is open: nothing is queued and no
    /// error is raised.
    pub fn subscribe(&mut self) {
        if !self.open {
            return;
        }
        self.send_op(SUBSCRIBE_OP);
        self.subscribed = true;
    }

    /// Cancel unconfirmed transaction notifications. No-op while closed.
    pub fn unsubscribe(&mut self) {
        if !self.open {
            return;
        }
        self.send_op(UNSUBSCRIBE_OP);
        self.subscribed = false;
    }

    fn send_op(&self, op: &str) {
        let frame = serde_json::to_string(&ControlFrame { op })
            .unwrap_or_else(|_| format!(r#"{{"op":"{}"}}"#, op));
        if let Err(e) = self.control.try_send(frame) {
            tracing::warn!(op, error = %e, "Failed to queue control frame");
        }
    }

    /// Shut the connection down. Safe to call more than once; only the first
    /// call signals the stream task.
    pub fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl Drop for FeedConnection {
    fn drop(&mut self) {
        self.close();
    }
}
