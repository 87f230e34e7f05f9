//! Client-side sync engine
//!
//! Keeps one shared text buffer synchronized with the server over a
//! persistent WebSocket connection.
//!
//! ## Data flow
//!
//! 1. Local edits feed the debouncer; the trailing edge of a burst goes
//!    out as a raw text frame carrying the whole buffer.
//! 2. Inbound frames carry the full room content and replace the buffer
//!    wholesale, unless the local user is mid-edit.
//! 3. Save and clear are JSON control frames; the channel is
//!    fire-and-forget, so frames sent while disconnected are dropped.
//!
//! ## Usage
//!
//! ```ignore
//! let config = SessionConfig::from_page_url("http://localhost:8080/demo")?;
//! let mut session = SyncSession::start(config, EditActivity::new());
//!
//! while let Some(event) = session.next_event().await {
//!     // redraw from session.buffer()
//! }
//! ```

mod connection;
mod debounce;
mod protocol;
mod session;
mod status;

pub use connection::{
    spawn_connection, Backoff, ConnectionEvent, ConnectionHandle, ConnectionStatus,
};
pub use debounce::Debouncer;
pub use protocol::{Action, ActionPayload, OutboundFrame};
pub use session::{
    ClearConfirmation, EditActivity, EditAwareness, RemoteOutcome, SessionEvent, SyncSession,
};
pub use status::{StatusPresenter, StatusView};
