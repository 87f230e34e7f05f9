//! Status presentation
//!
//! Pure projection of connection state for display. Exactly two
//! observable states: online, or offline-and-retrying. Connecting
//! renders as offline; the user only cares whether their edits are
//! flowing.

use tokio::sync::watch;

use crate::sync::connection::ConnectionStatus;

/// What the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusView {
    Online,
    Offline,
}

impl StatusView {
    pub fn from_connection(status: ConnectionStatus) -> Self {
        match status {
            ConnectionStatus::Connected => StatusView::Online,
            ConnectionStatus::Disconnected | ConnectionStatus::Connecting => StatusView::Offline,
        }
    }

    /// Indicator label.
    pub fn label(self) -> &'static str {
        match self {
            StatusView::Online => "Connected",
            StatusView::Offline => "Reconnecting...",
        }
    }

    pub fn is_online(self) -> bool {
        self == StatusView::Online
    }
}

/// Observes connection state on behalf of the display layer.
///
/// Never initiates anything.
#[derive(Debug, Clone)]
pub struct StatusPresenter {
    status_rx: watch::Receiver<ConnectionStatus>,
}

impl StatusPresenter {
    pub fn new(status_rx: watch::Receiver<ConnectionStatus>) -> Self {
        Self { status_rx }
    }

    /// Current view of the connection.
    pub fn view(&self) -> StatusView {
        StatusView::from_connection(*self.status_rx.borrow())
    }

    /// Wait for the next state change and return the new view.
    pub async fn changed(&mut self) -> Option<StatusView> {
        self.status_rx.changed().await.ok()?;
        Some(StatusView::from_connection(*self.status_rx.borrow()))
    }
}
