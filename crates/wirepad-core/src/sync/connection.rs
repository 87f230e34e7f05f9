//! Connection management
//!
//! Owns the WebSocket channel for one room: connect, disconnect
//! detection, and indefinite reconnection with additive backoff. The
//! channel is best-effort: frames sent while it is down are dropped, not
//! buffered.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};
use url::Url;

use std::time::Duration;

use crate::config::SessionConfig;
use crate::error::SyncResult;
use crate::sync::protocol::OutboundFrame;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Not connected; a retry may be pending.
    Disconnected,
    /// Attempting to open the channel.
    Connecting,
    /// Channel open and usable.
    Connected,
}

/// Lifecycle events, delivered to the session in arrival order.
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// Channel opened.
    Connected,
    /// Channel closed; a reconnect is scheduled.
    Disconnected,
    /// Full buffer content pushed by the server.
    Message(String),
}

/// Commands accepted by the connection task.
#[derive(Debug)]
enum ConnectionCommand {
    Send(OutboundFrame),
    Shutdown,
}

/// Additive reconnect backoff.
///
/// The delay starts at the floor, grows by a fixed step after each
/// consecutive failed cycle, and never exceeds the ceiling. A successful
/// open resets it to the floor.
#[derive(Debug)]
pub struct Backoff {
    floor: Duration,
    step: Duration,
    ceiling: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(floor: Duration, step: Duration, ceiling: Duration) -> Self {
        Self {
            floor,
            step,
            ceiling,
            current: floor,
        }
    }

    /// Delay to wait before the next attempt; grows the delay that the
    /// attempt after this one will see.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current + self.step).min(self.ceiling);
        delay
    }

    /// Reset to the floor after a successful connection.
    pub fn reset(&mut self) {
        self.current = self.floor;
    }
}

/// Handle for sending frames and observing connection state.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,
    status_rx: watch::Receiver<ConnectionStatus>,
}

impl ConnectionHandle {
    /// Current connection state.
    pub fn status(&self) -> ConnectionStatus {
        *self.status_rx.borrow()
    }

    /// Subscribe to connection state changes.
    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_rx.clone()
    }

    /// Transmit a frame if connected; otherwise the frame is silently
    /// dropped. No buffering, no error.
    pub fn send(&self, frame: OutboundFrame) {
        if self.status() != ConnectionStatus::Connected {
            debug!("Dropping outbound frame while disconnected");
            return;
        }
        let _ = self.command_tx.send(ConnectionCommand::Send(frame));
    }

    /// Stop the connection task. This is the teardown path - the analog
    /// of closing the hosting page - not an error path.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }
}

/// Spawn the connection task for a session.
///
/// Returns the control handle and the ordered lifecycle event stream.
pub fn spawn_connection(
    config: &SessionConfig,
) -> (ConnectionHandle, mpsc::UnboundedReceiver<ConnectionEvent>) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (status_tx, status_rx) = watch::channel(ConnectionStatus::Disconnected);

    tokio::spawn(connection_task(
        config.clone(),
        command_rx,
        event_tx,
        status_tx,
    ));

    (
        ConnectionHandle {
            command_tx,
            status_rx,
        },
        event_rx,
    )
}

/// Connect/retry loop. Reconnection is unconditional and indefinite;
/// only a shutdown command (or every handle being dropped) ends it.
async fn connection_task(
    config: SessionConfig,
    mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
    event_tx: mpsc::UnboundedSender<ConnectionEvent>,
    status_tx: watch::Sender<ConnectionStatus>,
) {
    let mut backoff = Backoff::new(
        config.initial_retry_delay,
        config.retry_delay_step,
        config.max_retry_delay,
    );

    loop {
        let _ = status_tx.send(ConnectionStatus::Connecting);

        match run_connection(
            &config.endpoint,
            &mut backoff,
            &mut command_rx,
            &event_tx,
            &status_tx,
        )
        .await
        {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => {
                // Errors are not distinguished by kind: any transport
                // fault collapses into close-then-retry.
                warn!("Connection error: {}", e);
            }
        }

        let _ = status_tx.send(ConnectionStatus::Disconnected);
        let _ = event_tx.send(ConnectionEvent::Disconnected);

        let delay = backoff.next_delay();
        debug!("Reconnecting in {:?}", delay);

        let retry = tokio::time::sleep(delay);
        tokio::pin!(retry);
        loop {
            tokio::select! {
                _ = &mut retry => break,
                cmd = command_rx.recv() => match cmd {
                    Some(ConnectionCommand::Shutdown) | None => return,
                    // Nothing is queued while offline.
                    Some(ConnectionCommand::Send(_)) => {}
                },
            }
        }
    }

    let _ = status_tx.send(ConnectionStatus::Disconnected);
}

/// Run one connected cycle: open the channel, then pump outbound
/// commands and inbound frames until it closes.
///
/// Returns `Ok(true)` on shutdown, `Ok(false)` on a server-side close.
async fn run_connection(
    endpoint: &Url,
    backoff: &mut Backoff,
    command_rx: &mut mpsc::UnboundedReceiver<ConnectionCommand>,
    event_tx: &mpsc::UnboundedSender<ConnectionEvent>,
    status_tx: &watch::Sender<ConnectionStatus>,
) -> SyncResult<bool> {
    debug!("Connecting to {}", endpoint);
    let (ws_stream, _) = connect_async(endpoint.as_str()).await?;

    info!("Connected to {}", endpoint);
    backoff.reset();
    let _ = status_tx.send(ConnectionStatus::Connected);
    let _ = event_tx.send(ConnectionEvent::Connected);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            cmd = command_rx.recv() => match cmd {
                Some(ConnectionCommand::Send(frame)) => {
                    write.send(frame.into_message()).await?;
                }
                Some(ConnectionCommand::Shutdown) | None => {
                    write.close().await.ok();
                    return Ok(true);
                }
            },
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    // Forwarded verbatim; the transport does not
                    // interpret content.
                    let _ = event_tx.send(ConnectionEvent::Message(text));
                }
                Some(Ok(Message::Close(_))) | None => return Ok(false),
                Some(Err(e)) => return Err(e.into()),
                // Ping/pong and binary are not part of the protocol.
                Some(Ok(_)) => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_backoff() -> Backoff {
        Backoff::new(
            Duration::from_millis(2000),
            Duration::from_millis(5000),
            Duration::from_millis(30000),
        )
    }

    #[test]
    fn test_backoff_grows_additively() {
        let mut backoff = default_backoff();

        assert_eq!(backoff.next_delay(), Duration::from_millis(2000));
        assert_eq!(backoff.next_delay(), Duration::from_millis(7000));
        assert_eq!(backoff.next_delay(), Duration::from_millis(12000));
        assert_eq!(backoff.next_delay(), Duration::from_millis(17000));
    }

    #[test]
    fn test_backoff_is_capped() {
        let mut backoff = default_backoff();

        let mut last = Duration::ZERO;
        for _ in 0..20 {
            last = backoff.next_delay();
        }
        assert_eq!(last, Duration::from_millis(30000));
        assert_eq!(backoff.next_delay(), Duration::from_millis(30000));
    }

    #[test]
    fn test_backoff_matches_additive_formula() {
        let mut backoff = default_backoff();

        for n in 0u64..10 {
            let expected = (2000 + 5000 * n).min(30000);
            assert_eq!(backoff.next_delay(), Duration::from_millis(expected));
        }
    }

    #[test]
    fn test_backoff_resets_on_success() {
        let mut backoff = default_backoff();

        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(2000));
    }
}
