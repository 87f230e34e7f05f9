//! Wirepad Core Library
//!
//! Client-side engine for wirepad, a shared text pad kept synchronized
//! across all connected viewers in real time.
//!
//! # Architecture
//!
//! One session owns one room. Local edits are coalesced and broadcast as
//! raw text frames over a persistent WebSocket; the server pushes back the
//! full buffer content of the room, which replaces the local buffer
//! wholesale unless the user is mid-edit. Conflict handling is deliberately
//! last-write-wins with local priority - there is no merging.
//!
//! # Quick Start
//!
//! ```text
//! let config = SessionConfig::from_page_url("http://localhost:8080/room1")?;
//! let editing = EditActivity::new();
//! let mut session = SyncSession::start(config, editing.clone());
//!
//! while let Some(event) = session.next_event().await {
//!     // redraw from session.buffer()
//! }
//! ```
//!
//! # Modules
//!
//! - `room`: room identity derived from the page path
//! - `config`: session configuration derived from the page URL
//! - `sync`: debouncer, connection management, session orchestration
//! - `error`: typed errors

pub mod config;
pub mod error;
pub mod room;
pub mod sync;

pub use config::SessionConfig;
pub use error::{SyncError, SyncResult};
pub use room::RoomId;
