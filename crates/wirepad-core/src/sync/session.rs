//! Session orchestration
//!
//! `SyncSession` wires local edits through the debouncer into outbound
//! raw-text frames, applies inbound updates to the buffer unless the user
//! is mid-edit, and performs the save and clear actions. All session
//! state (buffer, first-message flag, connection) lives here; teardown is
//! implicit on drop, the analog of page unload.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::config::{SessionConfig, SAVED_INDICATOR_HOLD};
use crate::room::RoomId;
use crate::sync::connection::{
    spawn_connection, ConnectionEvent, ConnectionHandle, ConnectionStatus,
};
use crate::sync::debounce::Debouncer;
use crate::sync::protocol::{ActionPayload, OutboundFrame};

/// Liveness signal for the local editing surface.
///
/// The session queries this before applying an inbound update, so a
/// broadcast never overwrites text the user is actively composing.
pub trait EditAwareness {
    fn is_editing(&self) -> bool;
}

/// Shared boolean edit-activity flag.
///
/// The editing surface flips it on focus changes; any clone observes it.
#[derive(Debug, Clone, Default)]
pub struct EditActivity(Arc<AtomicBool>);

impl EditActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_editing(&self, editing: bool) {
        self.0.store(editing, Ordering::Relaxed);
    }
}

impl EditAwareness for EditActivity {
    fn is_editing(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Yes/no gate guarding the destructive clear action.
pub trait ClearConfirmation {
    fn confirm_clear(&mut self, room: &RoomId) -> bool;
}

/// What happened to an inbound update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// Buffer replaced wholesale with the inbound content.
    Applied,
    /// User was mid-edit; the update was dropped.
    Discarded,
}

/// Events surfaced to the hosting surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Channel came up.
    Online,
    /// Channel dropped; reconnecting.
    Offline,
    /// Buffer was replaced by a remote update.
    BufferReplaced,
    /// A remote update arrived mid-edit and was dropped.
    RemoteDiscarded,
}

/// One live sync session for one room.
pub struct SyncSession<E> {
    room: RoomId,
    buffer: String,
    // "First message since load" is scoped to the whole session, not per
    // connection: a reconnect's first message goes through the normal
    // mid-edit check.
    awaiting_first_message: bool,
    editing: E,
    connection: ConnectionHandle,
    events_rx: mpsc::UnboundedReceiver<ConnectionEvent>,
    debouncer: Debouncer<String>,
    saved_tx: watch::Sender<bool>,
    saved_rx: watch::Receiver<bool>,
    save_epoch: Arc<AtomicU64>,
}

impl<E: EditAwareness> SyncSession<E> {
    /// Start a session: open the connection (retrying forever) and wire
    /// the debounced edit path into it.
    pub fn start(config: SessionConfig, editing: E) -> Self {
        let (connection, events_rx) = spawn_connection(&config);
        let (debouncer, mut debounced_rx) = Debouncer::spawn(config.debounce_delay);

        // The trailing edge of an edit burst becomes one raw text frame.
        let sender = connection.clone();
        tokio::spawn(async move {
            while let Some(text) = debounced_rx.recv().await {
                sender.send(OutboundFrame::Text(text));
            }
        });

        let (saved_tx, saved_rx) = watch::channel(false);

        Self {
            room: config.room,
            buffer: String::new(),
            awaiting_first_message: true,
            editing,
            connection,
            events_rx,
            debouncer,
            saved_tx,
            saved_rx,
            save_epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// The shared buffer as this client currently sees it.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current connection state.
    pub fn status(&self) -> ConnectionStatus {
        self.connection.status()
    }

    /// Watch connection state, for the status indicator.
    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.connection.subscribe_status()
    }

    /// Watch the cosmetic saved indicator.
    pub fn subscribe_saved(&self) -> watch::Receiver<bool> {
        self.saved_rx.clone()
    }

    /// Record a local edit. The buffer changes immediately; the
    /// broadcast waits for the burst to go quiet.
    pub fn note_local_edit(&mut self, text: String) {
        self.buffer = text.clone();
        self.debouncer.schedule(text);
    }

    /// Apply an inbound full-buffer update.
    ///
    /// The very first message of the session always lands - it is the
    /// server's snapshot of the room. After that, updates arriving while
    /// the user is mid-edit are dropped: last-write-wins with local
    /// priority, not a merge.
    pub fn apply_remote(&mut self, text: String) -> RemoteOutcome {
        if self.awaiting_first_message || !self.editing.is_editing() {
            self.awaiting_first_message = false;
            self.buffer = text;
            RemoteOutcome::Applied
        } else {
            debug!("Dropping inbound update while editing");
            RemoteOutcome::Discarded
        }
    }

    /// Wait for the next session event.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let event = self.events_rx.recv().await?;
        Some(self.handle_connection_event(event))
    }

    /// Drain one pending session event without waiting.
    pub fn try_event(&mut self) -> Option<SessionEvent> {
        let event = self.events_rx.try_recv().ok()?;
        Some(self.handle_connection_event(event))
    }

    fn handle_connection_event(&mut self, event: ConnectionEvent) -> SessionEvent {
        match event {
            ConnectionEvent::Connected => SessionEvent::Online,
            ConnectionEvent::Disconnected => SessionEvent::Offline,
            ConnectionEvent::Message(text) => match self.apply_remote(text) {
                RemoteOutcome::Applied => SessionEvent::BufferReplaced,
                RemoteOutcome::Discarded => SessionEvent::RemoteDiscarded,
            },
        }
    }

    /// Ask the server to persist the current buffer.
    ///
    /// The saved indicator is cosmetic, not a delivery receipt: it
    /// lights whether or not the frame was actually transmitted, and
    /// reverts after a short hold. There is no retry.
    pub fn save(&mut self) {
        let payload = ActionPayload::save(self.buffer.clone(), &self.room);
        self.connection.send(OutboundFrame::Control(payload));

        let epoch = self.save_epoch.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = self.saved_tx.send(true);

        let saved_tx = self.saved_tx.clone();
        let save_epoch = Arc::clone(&self.save_epoch);
        tokio::spawn(async move {
            tokio::time::sleep(SAVED_INDICATOR_HOLD).await;
            // Only the latest save's timer may turn the light off.
            if save_epoch.load(Ordering::Relaxed) == epoch {
                let _ = saved_tx.send(false);
            }
        });
    }

    /// Clear the room, guarded by an interactive confirmation.
    ///
    /// Declining sends nothing and leaves the buffer untouched. On
    /// confirmation the local buffer empties immediately; the server is
    /// told to wipe its copy but is not waited on.
    pub fn clear(&mut self, gate: &mut impl ClearConfirmation) -> bool {
        if !gate.confirm_clear(&self.room) {
            return false;
        }

        let payload = ActionPayload::clear(&self.room);
        self.connection.send(OutboundFrame::Control(payload));
        self.buffer.clear();
        true
    }

    /// Tear the session down. Dropping the session has the same effect.
    pub fn shutdown(&self) {
        self.connection.shutdown();
    }
}
