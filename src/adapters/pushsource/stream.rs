//! Notification stream listener
//!
//! Maintains one WebSocket connection to the source's change stream and
//! turns `tickle` signals into fetch cycles. Fetch cycles run serialized:
//! a signal that arrives mid-cycle queues in the channel and triggers the
//! next cycle after the current one finishes.
//!
//! The listener never reconnects on its own. Transport failures transition
//! it to `Disconnected` and surface as errors for the supervisor to handle.

use crate::adapters::pushsource::client::PushFetcher;
use crate::adapters::pushsource::models::StreamSignal;
use crate::config::SourceConfig;
use crate::core::cursor::{Cursor, CursorStore};
use crate::core::dedup::plan_batch;
use crate::core::pipeline::ItemBatchHandler;
use crate::domain::errors::TransportError;
use crate::domain::Result;
use futures::StreamExt;
use secrecy::ExposeSecret;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

/// Listener connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Event forwarded from the reader task to the signal loop
#[derive(Debug)]
enum StreamEvent {
    Signal(StreamSignal),
    Closed(String),
}

/// WebSocket listener driving the fetch-dedup-deliver loop
pub struct PushListener {
    config: SourceConfig,
    fetcher: Arc<dyn PushFetcher>,
    handler: Arc<dyn ItemBatchHandler>,
    store: Arc<dyn CursorStore>,
    state: Mutex<ConnectionState>,
    shutdown_tx: watch::Sender<bool>,
}

impl PushListener {
    /// Build a listener over its three seams
    pub fn new(
        config: SourceConfig,
        fetcher: Arc<dyn PushFetcher>,
        handler: Arc<dyn ItemBatchHandler>,
        store: Arc<dyn CursorStore>,
    ) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            config,
            fetcher,
            handler,
            store,
            state: Mutex::new(ConnectionState::Disconnected),
            shutdown_tx,
        }
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        *self.state.lock().expect("state lock")
    }

    fn set_state(&self, next: ConnectionState) {
        *self.state.lock().expect("state lock") = next;
    }

    /// Request disconnect; valid from any state
    pub fn close(&self) {
        let _ = self.shutdown_tx.send(true);
        self.set_state(ConnectionState::Disconnected);
        tracing::info!("Stream listener closed");
    }

    /// Connect and process signals until closed or the stream fails
    ///
    /// Calling this while already connected is a logged no-op. On a clean
    /// [`close`](Self::close) it returns `Ok`; any transport failure
    /// returns the error for the supervisor.
    pub async fn connect(&self) -> Result<()> {
        {
            let mut state = self.state.lock().expect("state lock");
            if *state == ConnectionState::Connected {
                tracing::info!("Stream already connected, ignoring connect request");
                return Ok(());
            }
            *state = ConnectionState::Connecting;
        }

        let url = format!(
            "{}/{}",
            self.config.stream_url,
            self.config.access_token.expose_secret()
        );

        let (ws, _) = match connect_async(url.as_str()).await {
            Ok(connected) => connected,
            Err(e) => {
                self.set_state(ConnectionState::Disconnected);
                return Err(TransportError::ConnectFailed(e.to_string()).into());
            }
        };

        self.set_state(ConnectionState::Connected);
        tracing::info!("Connected to notification stream");

        let (event_tx, mut event_rx) = mpsc::channel::<StreamEvent>(32);
        let mut reader_shutdown = self.shutdown_tx.subscribe();
        tokio::spawn(read_stream(ws, event_tx, async move {
            let _ = reader_shutdown.changed().await;
        }));

        // Catch up on pushes that arrived while disconnected.
        self.run_fetch_cycle().await?;

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        loop {
            tokio::select! {
                event = event_rx.recv() => match event {
                    Some(StreamEvent::Signal(signal)) => {
                        if signal.is_push_tickle() {
                            tracing::debug!("Push tickle received, starting fetch cycle");
                            self.run_fetch_cycle().await?;
                        } else {
                            tracing::trace!(?signal, "Ignoring non-push signal");
                        }
                    }
                    Some(StreamEvent::Closed(reason)) => {
                        self.set_state(ConnectionState::Disconnected);
                        return Err(TransportError::StreamClosed(reason).into());
                    }
                    None => {
                        self.set_state(ConnectionState::Disconnected);
                        return Err(TransportError::StreamClosed(
                            "reader task ended".to_string(),
                        )
                        .into());
                    }
                },
                _ = shutdown_rx.changed() => {
                    self.set_state(ConnectionState::Disconnected);
                    tracing::info!("Stream listener shutting down");
                    return Ok(());
                }
            }
        }
    }

    /// Run one fetch-dedup-deliver cycle
    ///
    /// Cursor read failures degrade to a clean start; list failures abort
    /// the cycle with the cursor untouched; cursor write failures are
    /// logged and the next cycle persists again. None of these kill the
    /// connection.
    pub async fn run_fetch_cycle(&self) -> Result<()> {
        let cursor = match self.store.load().await {
            Ok(cursor) => cursor,
            Err(e) => {
                tracing::warn!(error = %e, "Cursor unreadable, starting from scratch");
                None
            }
        };

        let modified_after = cursor.as_ref().map_or(0.0, |c| c.modified);
        let batch = match self
            .fetcher
            .fetch_since(modified_after, self.config.batch_limit)
            .await
        {
            Ok(batch) => batch,
            Err(e) => {
                tracing::warn!(error = %e, "List request failed, aborting cycle");
                return Ok(());
            }
        };

        let plan = plan_batch(batch, cursor.as_ref(), &self.config.device_iden);

        if !plan.deliverable.is_empty() {
            tracing::info!(count = plan.deliverable.len(), "Delivering new items");
            self.handler.handle_batch(plan.deliverable).await;
        }

        if let Some(next) = plan.next_cursor {
            self.advance_cursor(cursor, next).await;
        }

        Ok(())
    }

    async fn advance_cursor(&self, current: Option<Cursor>, next: Cursor) {
        if let Some(current) = &current {
            if !current.accepts(&next) {
                tracing::warn!(
                    current = current.modified,
                    candidate = next.modified,
                    "Refusing cursor regression"
                );
                return;
            }
        }

        if let Err(e) = self.store.save(&next).await {
            tracing::warn!(error = %e, "Failed to persist cursor, continuing");
        }
    }
}

/// Reader task: drain the WebSocket into stream events
async fn read_stream<S>(
    mut ws: S,
    events: mpsc::Sender<StreamEvent>,
    shutdown: impl std::future::Future<Output = ()>,
) where
    S: StreamExt<Item = std::result::Result<Message, tokio_tungstenite::tungstenite::Error>>
        + Unpin,
{
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            message = ws.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<StreamSignal>(&text) {
                        Ok(signal) => {
                            if events.send(StreamEvent::Signal(signal)).await.is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Discarding malformed stream frame");
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    let _ = events
                        .send(StreamEvent::Closed("stream closed by server".to_string()))
                        .await;
                    return;
                }
                Some(Ok(_)) => {} // ping/pong/binary
                Some(Err(e)) => {
                    let _ = events.send(StreamEvent::Closed(e.to_string())).await;
                    return;
                }
            },
            _ = &mut shutdown => return,
        }
    }
}
